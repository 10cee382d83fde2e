// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Month, OffsetDateTime};

use crate::forms::{AccountFormInput, Draft, ItemFormInput, OrderFormInput, SupplierFormInput};
use crate::ids::*;
use crate::validation::format_cents;
use crate::ValidationError;

/// A record type served by one remote collection.
pub trait Resource: Clone + fmt::Debug + Serialize + DeserializeOwned {
    type Id: Clone + Eq + fmt::Debug + fmt::Display;
    type Draft: Draft;
    /// Fixed per-view restriction applied before the search query.
    type Scope: Clone + Default + fmt::Debug + PartialEq;

    /// Path segment of the remote collection.
    const COLLECTION: &'static str;
    /// Singular display label, capitalized for notices.
    const LABEL: &'static str;
    const PLURAL: &'static str;

    fn id(&self) -> &Self::Id;

    /// Text the search query is matched against.
    fn search_text(&self) -> String;

    fn in_scope(&self, _scope: &Self::Scope) -> bool {
        true
    }

    fn to_draft(&self) -> Self::Draft;

    fn columns() -> &'static [&'static str];

    fn cells(&self) -> Vec<String>;

    fn check_removable(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

macro_rules! open_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub const KNOWN: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)+
                    Self::Other(value) => value,
                }
            }

            pub fn parse(value: &str) -> Self {
                match value {
                    $($text => Self::$variant,)+
                    other => Self::Other(other.to_owned()),
                }
            }

            pub const fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_owned()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum!(ItemCategory {
    Snacks => "Snacks",
    Bakery => "Bakery",
    Sweets => "Sweets",
});

open_enum!(AccountRole {
    Admin => "admin",
    InventoryManager => "inventoryManager",
    StaffManager => "staffManager",
    SupplierManager => "supplierManager",
    Driver => "driver",
    Customer => "customer",
});

open_enum!(OrderStatus {
    Pending => "pending",
    Accepted => "accepted",
    Delivering => "delivering",
    Completed => "completed",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub item_name: String,
    pub category: ItemCategory,
    pub quantity: u32,
    #[serde(rename = "price", with = "crate::validation::decimal_cents")]
    pub price_cents: i64,
    #[serde(default)]
    pub img: String,
}

impl Resource for Item {
    type Id = ItemId;
    type Draft = ItemFormInput;
    type Scope = ();

    const COLLECTION: &'static str = "item";
    const LABEL: &'static str = "Item";
    const PLURAL: &'static str = "items";

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn search_text(&self) -> String {
        self.item_name.clone()
    }

    fn to_draft(&self) -> ItemFormInput {
        ItemFormInput {
            item_name: self.item_name.clone(),
            category: self.category.clone(),
            quantity: self.quantity,
            price_cents: self.price_cents,
            img: self.img.clone(),
        }
    }

    fn columns() -> &'static [&'static str] {
        &["Name", "Category", "Quantity", "Price"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.item_name.clone(),
            self.category.to_string(),
            self.quantity.to_string(),
            format_cents(self.price_cents),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountScope {
    #[default]
    All,
    /// Everyone who is neither a customer nor a driver.
    Staff,
    Customers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub contact_no: String,
    pub role: AccountRole,
}

impl Account {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

impl Resource for Account {
    type Id = AccountId;
    type Draft = AccountFormInput;
    type Scope = AccountScope;

    const COLLECTION: &'static str = "user";
    const LABEL: &'static str = "Account";
    const PLURAL: &'static str = "accounts";

    fn id(&self) -> &AccountId {
        &self.id
    }

    fn search_text(&self) -> String {
        self.full_name()
    }

    fn in_scope(&self, scope: &AccountScope) -> bool {
        match scope {
            AccountScope::All => true,
            AccountScope::Staff => {
                self.role != AccountRole::Customer && self.role != AccountRole::Driver
            }
            AccountScope::Customers => self.role == AccountRole::Customer,
        }
    }

    fn to_draft(&self) -> AccountFormInput {
        AccountFormInput {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            contact_no: self.contact_no.clone(),
            role: self.role.clone(),
            password: None,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["First Name", "Last Name", "Email", "Contact No", "Role"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.contact_no.clone(),
            self.role.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(rename = "_id")]
    pub id: SupplierId,
    pub company_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub p_description: String,
}

impl Resource for Supplier {
    type Id = SupplierId;
    type Draft = SupplierFormInput;
    type Scope = ();

    const COLLECTION: &'static str = "supplier";
    const LABEL: &'static str = "Supplier";
    const PLURAL: &'static str = "suppliers";

    fn id(&self) -> &SupplierId {
        &self.id
    }

    fn search_text(&self) -> String {
        self.company_name.clone()
    }

    fn to_draft(&self) -> SupplierFormInput {
        SupplierFormInput {
            company_name: self.company_name.clone(),
            name: self.name.clone(),
            mobile: self.mobile.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            p_description: self.p_description.clone(),
        }
    }

    fn columns() -> &'static [&'static str] {
        &[
            "Company Name",
            "Supplier Name",
            "Phone",
            "Email",
            "Address",
            "Product Description",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.company_name.clone(),
            self.name.clone(),
            self.mobile.clone(),
            self.email.clone(),
            self.address.clone(),
            self.p_description.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRef {
    #[serde(rename = "_id")]
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
}

impl DriverRef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Calendar month an order was placed in; `None` keeps every order.
pub type OrderScope = Option<Month>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub status: OrderStatus,
    #[serde(rename = "driverId", default)]
    pub driver: Option<DriverRef>,
}

impl Resource for Order {
    type Id = OrderId;
    type Draft = OrderFormInput;
    type Scope = OrderScope;

    const COLLECTION: &'static str = "order";
    const LABEL: &'static str = "Order";
    const PLURAL: &'static str = "orders";

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn search_text(&self) -> String {
        match &self.driver {
            Some(driver) => format!("{} {}", self.status, driver.full_name()),
            None => self.status.to_string(),
        }
    }

    fn in_scope(&self, scope: &OrderScope) -> bool {
        scope.is_none_or(|month| self.created_at.month() == month)
    }

    fn to_draft(&self) -> OrderFormInput {
        OrderFormInput {
            status: self.status.clone(),
            driver_id: self.driver.as_ref().map(|driver| driver.id.clone()),
        }
    }

    fn columns() -> &'static [&'static str] {
        &["Id", "Date", "Driver", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        let date = self.created_at.date();
        vec![
            self.id.to_string(),
            format!("{}-{:02}-{:02}", date.year(), date.month() as u8, date.day()),
            self.driver
                .as_ref()
                .map_or_else(|| "N/A".to_owned(), DriverRef::full_name),
            self.status.to_string(),
        ]
    }

    fn check_removable(&self) -> Result<(), ValidationError> {
        if self.status == OrderStatus::Completed {
            return Err(ValidationError::new(
                "status",
                "completed orders cannot be removed",
            ));
        }
        Ok(())
    }
}

/// Management screens, one per list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    Inventory,
    Staff,
    Suppliers,
    Customers,
    Orders,
}

impl ViewKind {
    pub const ALL: [Self; 5] = [
        Self::Inventory,
        Self::Staff,
        Self::Suppliers,
        Self::Customers,
        Self::Orders,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Staff => "staff",
            Self::Suppliers => "suppliers",
            Self::Customers => "customers",
            Self::Orders => "orders",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "inventory" | "items" => Some(Self::Inventory),
            "staff" => Some(Self::Staff),
            "suppliers" => Some(Self::Suppliers),
            "customers" | "users" => Some(Self::Customers),
            "orders" => Some(Self::Orders),
            _ => None,
        }
    }

    /// Heading used for exported documents.
    pub const fn report_title(self) -> &'static str {
        match self {
            Self::Inventory => "Inventory",
            Self::Staff => "Our Staff Members",
            Self::Suppliers => "Supplier List",
            Self::Customers => "Detailed Report of Customers",
            Self::Orders => "Order Details",
        }
    }

    pub const fn account_scope(self) -> AccountScope {
        match self {
            Self::Staff => AccountScope::Staff,
            Self::Customers => AccountScope::Customers,
            Self::Inventory | Self::Suppliers | Self::Orders => AccountScope::All,
        }
    }
}
