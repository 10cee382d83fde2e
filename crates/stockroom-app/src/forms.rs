// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;
use std::fmt;

use crate::validation::{
    ValidationResult, check_contact_no, check_email, parse_price, parse_quantity, required_text,
};
use crate::{AccountId, AccountRole, ItemCategory, OrderStatus, ValidationError};

/// Editable field set of one record, sent as the JSON body of creates and updates.
pub trait Draft: Clone + Default + fmt::Debug + PartialEq + Serialize {
    /// Applies one string-typed edit from a form field.
    fn set_field(&mut self, name: &str, value: &str) -> ValidationResult<()>;

    fn validate(&self) -> ValidationResult<()>;

    /// Extra checks that only apply when the draft creates a record.
    fn validate_new(&self) -> ValidationResult<()> {
        self.validate()
    }
}

fn unknown_field(name: &str) -> ValidationError {
    ValidationError::new(name, "is not an editable field")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFormInput {
    pub item_name: String,
    pub category: ItemCategory,
    pub quantity: u32,
    #[serde(rename = "price", with = "crate::validation::decimal_cents")]
    pub price_cents: i64,
    pub img: String,
}

impl Default for ItemFormInput {
    fn default() -> Self {
        Self {
            item_name: String::new(),
            category: ItemCategory::Snacks,
            quantity: 0,
            price_cents: 0,
            img: String::new(),
        }
    }
}

impl Draft for ItemFormInput {
    fn set_field(&mut self, name: &str, value: &str) -> ValidationResult<()> {
        match name {
            "itemName" => self.item_name = value.to_owned(),
            "category" => self.category = ItemCategory::parse(value.trim()),
            "quantity" => self.quantity = parse_quantity(name, value)?,
            "price" => self.price_cents = parse_price(name, value)?,
            "img" => self.img = value.trim().to_owned(),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }

    fn validate(&self) -> ValidationResult<()> {
        required_text("itemName", &self.item_name)?;
        if !self.category.is_known() {
            let known = ItemCategory::KNOWN
                .iter()
                .map(ItemCategory::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ValidationError::new(
                "category",
                format!("must be one of {known}"),
            ));
        }
        if self.price_cents < 0 {
            return Err(ValidationError::new("price", "cannot be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFormInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_no: String,
    pub role: AccountRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for AccountFormInput {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            contact_no: String::new(),
            role: AccountRole::Customer,
            password: None,
        }
    }
}

impl Draft for AccountFormInput {
    fn set_field(&mut self, name: &str, value: &str) -> ValidationResult<()> {
        match name {
            "firstName" => self.first_name = value.to_owned(),
            "lastName" => self.last_name = value.to_owned(),
            "email" => self.email = value.trim().to_owned(),
            "contactNo" => self.contact_no = value.trim().to_owned(),
            "role" => self.role = AccountRole::parse(value.trim()),
            "password" => self.password = Some(value.to_owned()),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }

    fn validate(&self) -> ValidationResult<()> {
        required_text("firstName", &self.first_name)?;
        required_text("lastName", &self.last_name)?;
        check_contact_no("contactNo", &self.contact_no)?;
        check_email("email", &self.email)?;
        if self.role.as_str().trim().is_empty() {
            return Err(ValidationError::new("role", "is required"));
        }
        Ok(())
    }

    fn validate_new(&self) -> ValidationResult<()> {
        self.validate()?;
        match self.password.as_deref() {
            Some(password) if !password.is_empty() => Ok(()),
            _ => Err(ValidationError::new("password", "is required")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierFormInput {
    pub company_name: String,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub p_description: String,
}

impl Draft for SupplierFormInput {
    fn set_field(&mut self, name: &str, value: &str) -> ValidationResult<()> {
        match name {
            "companyName" => self.company_name = value.to_owned(),
            "name" => self.name = value.to_owned(),
            "mobile" => self.mobile = value.trim().to_owned(),
            "email" => self.email = value.trim().to_owned(),
            "address" => self.address = value.to_owned(),
            "pDescription" => self.p_description = value.to_owned(),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }

    fn validate(&self) -> ValidationResult<()> {
        required_text("companyName", &self.company_name)?;
        if !self.email.is_empty() {
            check_email("email", &self.email)?;
        }
        if !self.mobile.is_empty() {
            check_contact_no("mobile", &self.mobile)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFormInput {
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<AccountId>,
}

impl Default for OrderFormInput {
    fn default() -> Self {
        Self {
            status: OrderStatus::Pending,
            driver_id: None,
        }
    }
}

impl Draft for OrderFormInput {
    fn set_field(&mut self, name: &str, value: &str) -> ValidationResult<()> {
        match name {
            "status" => self.status = OrderStatus::parse(value.trim()),
            "driverId" => {
                let value = value.trim();
                self.driver_id = (!value.is_empty()).then(|| AccountId::new(value));
            }
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }

    fn validate(&self) -> ValidationResult<()> {
        if !self.status.is_known() {
            return Err(ValidationError::new(
                "status",
                format!("{:?} is not an order status", self.status.as_str()),
            ));
        }
        Ok(())
    }
}

/// Rating a customer leaves for the driver of a delivered order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverReviewInput {
    pub driver_id: AccountId,
    pub rate: u8,
}

impl DriverReviewInput {
    pub fn validate(&self) -> ValidationResult<()> {
        if self.driver_id.as_str().trim().is_empty() {
            return Err(ValidationError::new("driverId", "is required"));
        }
        if !(1..=5).contains(&self.rate) {
            return Err(ValidationError::new("rate", "must be between 1 and 5"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AccountFormInput, Draft, DriverReviewInput, ItemFormInput, OrderFormInput,
        SupplierFormInput,
    };
    use crate::{AccountId, AccountRole, ItemCategory, OrderStatus};

    fn staff_form() -> AccountFormInput {
        AccountFormInput {
            first_name: "Riley".to_owned(),
            last_name: "Hill".to_owned(),
            email: "riley.hill@gmail.com".to_owned(),
            contact_no: "0771234567".to_owned(),
            role: AccountRole::StaffManager,
            password: None,
        }
    }

    #[test]
    fn item_fields_parse_and_validate() {
        let mut form = ItemFormInput::default();
        form.set_field("itemName", "Widget").expect("name");
        form.set_field("category", "Bakery").expect("category");
        form.set_field("quantity", "12").expect("quantity");
        form.set_field("price", "3.5").expect("price");
        assert_eq!(form.category, ItemCategory::Bakery);
        assert_eq!(form.price_cents, 350);
        assert!(form.validate().is_ok());

        let body = serde_json::to_value(&form).expect("encode item form");
        assert_eq!(body["itemName"], "Widget");
        assert_eq!(body["price"], 3.5);
    }

    #[test]
    fn item_validation_rejects_empty_name_and_unknown_category() {
        let form = ItemFormInput::default();
        assert_eq!(form.validate().expect_err("empty name").field, "itemName");

        let form = ItemFormInput {
            item_name: "Widget".to_owned(),
            category: ItemCategory::parse("Toys"),
            ..ItemFormInput::default()
        };
        let error = form.validate().expect_err("unknown category");
        assert_eq!(error.field, "category");
        assert!(error.reason.contains("Snacks, Bakery, Sweets"));
    }

    #[test]
    fn bad_field_value_leaves_draft_untouched() {
        let mut form = ItemFormInput::default();
        form.set_field("quantity", "4").expect("quantity");
        assert!(form.set_field("quantity", "lots").is_err());
        assert_eq!(form.quantity, 4);
        assert!(form.set_field("colour", "red").is_err());
    }

    #[test]
    fn account_validation_checks_phone_and_email() {
        assert!(staff_form().validate().is_ok());

        let mut short_phone = staff_form();
        short_phone.contact_no = "12345".to_owned();
        assert_eq!(
            short_phone.validate().expect_err("short phone").field,
            "contactNo"
        );

        let mut bad_email = staff_form();
        bad_email.email = "riley".to_owned();
        assert_eq!(bad_email.validate().expect_err("bad email").field, "email");
    }

    #[test]
    fn new_accounts_need_a_password() {
        let mut form = staff_form();
        assert_eq!(
            form.validate_new().expect_err("missing password").field,
            "password"
        );
        form.set_field("password", "s3cret").expect("password");
        assert!(form.validate_new().is_ok());

        let body = serde_json::to_value(&form).expect("encode account form");
        assert_eq!(body["password"], "s3cret");
        assert_eq!(body["role"], "staffManager");
    }

    #[test]
    fn update_body_omits_password() {
        let body = serde_json::to_value(staff_form()).expect("encode account form");
        assert!(body.get("password").is_none());
    }

    #[test]
    fn supplier_optional_contact_fields_are_checked_when_present() {
        let mut form = SupplierFormInput {
            company_name: "Greenleaf Foods".to_owned(),
            ..SupplierFormInput::default()
        };
        assert!(form.validate().is_ok());
        form.set_field("mobile", "123").expect("mobile");
        assert_eq!(form.validate().expect_err("short mobile").field, "mobile");

        let body = serde_json::to_value(&form).expect("encode supplier form");
        assert!(body.get("pDescription").is_some());
    }

    #[test]
    fn order_status_must_be_known() {
        let mut form = OrderFormInput::default();
        form.set_field("status", "delivering").expect("status");
        assert_eq!(form.status, OrderStatus::Delivering);
        assert!(form.validate().is_ok());

        form.set_field("status", "lost").expect("status");
        assert!(form.validate().is_err());

        form.set_field("driverId", " ").expect("driver");
        assert_eq!(form.driver_id, None);
    }

    #[test]
    fn review_rate_is_bounded() {
        let review = DriverReviewInput {
            driver_id: AccountId::new("d1"),
            rate: 6,
        };
        assert_eq!(review.validate().expect_err("rate").field, "rate");
        assert!(
            DriverReviewInput {
                rate: 5,
                ..review
            }
            .validate()
            .is_ok()
        );
    }
}
