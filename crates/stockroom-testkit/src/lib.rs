// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration as StdDuration;
use stockroom_app::{
    Account, AccountFormInput, AccountId, AccountRole, DriverRef, Item, ItemCategory,
    ItemFormInput, ItemId, Order, OrderFormInput, OrderId, OrderStatus, RemoteCollection,
    RemoteError, Resource, Supplier, SupplierFormInput, SupplierId,
};
use time::{Date, Duration, Month, OffsetDateTime, Time};

const SNACKS: [&str; 10] = [
    "Potato Chips",
    "Salted Peanuts",
    "Cheese Crackers",
    "Pretzel Twists",
    "Trail Mix",
    "Rice Crisps",
    "Popcorn",
    "Cashew Mix",
    "Corn Puffs",
    "Banana Chips",
];

const BAKERY: [&str; 10] = [
    "Sourdough Loaf",
    "Butter Croissant",
    "Rye Bread",
    "Cinnamon Roll",
    "Bagel",
    "Brioche",
    "Baguette",
    "Focaccia",
    "Blueberry Muffin",
    "Pita",
];

const SWEETS: [&str; 10] = [
    "Chocolate Bar",
    "Fudge Brownie",
    "Caramel Toffee",
    "Jelly Beans",
    "Gummy Bears",
    "Lemon Tart",
    "Honey Cake",
    "Milk Toffee",
    "Coconut Ladoo",
    "Mint Drops",
];

const SUPPLIER_ADJECTIVES: [&str; 12] = [
    "Premier",
    "Central",
    "Reliable",
    "Bright",
    "Quality",
    "Summit",
    "Eagle",
    "Heritage",
    "Greenleaf",
    "Golden",
    "Hartley",
    "Apex",
];
const SUPPLIER_GOODS: [&str; 8] = [
    "Foods",
    "Bakers",
    "Confectioners",
    "Grains",
    "Dairy",
    "Produce",
    "Packaging",
    "Traders",
];
const SUPPLIER_SUFFIXES: [&str; 5] = ["Ltd", "Co", "Group", "Supply", "Partners"];

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];
const STREET_NAMES: [&str; 10] = [
    "Cedar", "Maple", "Oak", "Pine", "Willow", "Elm", "Birch", "Juniper", "Lakeview", "Meadow",
];
const EMAIL_DOMAINS: [&str; 4] = ["gmail.com", "example.com", "shop.local", "mail.net"];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of realistic store records.
#[derive(Debug, Clone)]
pub struct StockFaker {
    rng: DeterministicRng,
    serial: u64,
}

impl StockFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            serial: 0,
        }
    }

    pub fn item(&mut self) -> Item {
        let category = ItemCategory::KNOWN[self.rng.int_n(ItemCategory::KNOWN.len())].clone();
        let names = match category {
            ItemCategory::Bakery => &BAKERY,
            ItemCategory::Sweets => &SWEETS,
            _ => &SNACKS,
        };
        let name = self.pick(names);
        self.item_named(name, category)
    }

    pub fn item_named(&mut self, name: &str, category: ItemCategory) -> Item {
        Item {
            id: ItemId::new(self.next_id("item")),
            item_name: name.to_owned(),
            category,
            quantity: self.int_range(0, 250) as u32,
            price_cents: self.int_range(50, 2_500) * 5,
            img: String::new(),
        }
    }

    pub fn account(&mut self, role: AccountRole) -> Account {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let domain = self.pick(&EMAIL_DOMAINS);
        Account {
            id: AccountId::new(self.next_id("user")),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            email: format!(
                "{}.{}@{domain}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase()
            ),
            contact_no: self.contact_no(),
            role,
        }
    }

    pub fn supplier(&mut self) -> Supplier {
        let company = format!(
            "{} {} {}",
            self.pick(&SUPPLIER_ADJECTIVES),
            self.pick(&SUPPLIER_GOODS),
            self.pick(&SUPPLIER_SUFFIXES),
        );
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let goods = [self.pick(&SNACKS), self.pick(&BAKERY), self.pick(&SWEETS)];
        Supplier {
            id: SupplierId::new(self.next_id("supplier")),
            company_name: company,
            name: format!("{first} {last}"),
            mobile: self.contact_no(),
            email: format!("{}@{}", first.to_ascii_lowercase(), self.pick(&EMAIL_DOMAINS)),
            address: format!(
                "{} {} Road",
                self.int_range(1, 999),
                self.pick(&STREET_NAMES)
            ),
            p_description: goods.join(", "),
        }
    }

    pub fn driver(&mut self) -> DriverRef {
        let driver = self.account(AccountRole::Driver);
        DriverRef {
            id: driver.id,
            first_name: driver.first_name,
            last_name: driver.last_name,
        }
    }

    pub fn order(&mut self, status: OrderStatus) -> Order {
        let month = Month::try_from(self.int_range(1, 12) as u8).unwrap_or(Month::January);
        self.order_in_month(month, status)
    }

    pub fn order_in_month(&mut self, month: Month, status: OrderStatus) -> Order {
        let day = self.int_range(1, 28) as u8;
        let placed = midnight_utc(REFERENCE_YEAR, month, day)
            + Duration::minutes(self.int_range(8 * 60, 20 * 60));
        let driver = match status {
            OrderStatus::Pending => None,
            _ => Some(self.driver()),
        };
        Order {
            id: OrderId::new(self.next_id("order")),
            created_at: placed,
            status,
            driver,
        }
    }

    fn contact_no(&mut self) -> String {
        format!("07{:08}", self.int_range(0, 99_999_999))
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.serial += 1;
        format!("{prefix}-{:04}-{:04x}", self.serial, self.rng.int_n(0x1_0000))
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

/// Record types [`MemoryRemote`] can store.
pub trait MemoryRecord: Resource {
    /// Builds the stored record for a create (`existing` is `None`) or an update.
    fn from_draft(id: &str, draft: &Self::Draft, existing: Option<&Self>) -> Self;

    /// Server-side `?filter=` semantics.
    fn matches_filter(&self, filter: &str) -> bool {
        self.search_text()
            .to_lowercase()
            .contains(&filter.to_lowercase())
    }
}

impl MemoryRecord for Item {
    fn from_draft(id: &str, draft: &ItemFormInput, _existing: Option<&Self>) -> Self {
        Self {
            id: ItemId::new(id),
            item_name: draft.item_name.trim().to_owned(),
            category: draft.category.clone(),
            quantity: draft.quantity,
            price_cents: draft.price_cents,
            img: draft.img.clone(),
        }
    }
}

impl MemoryRecord for Account {
    fn from_draft(id: &str, draft: &AccountFormInput, _existing: Option<&Self>) -> Self {
        Self {
            id: AccountId::new(id),
            first_name: draft.first_name.trim().to_owned(),
            last_name: draft.last_name.trim().to_owned(),
            email: draft.email.clone(),
            contact_no: draft.contact_no.clone(),
            role: draft.role.clone(),
        }
    }

    fn matches_filter(&self, filter: &str) -> bool {
        self.role.as_str() == filter
    }
}

impl MemoryRecord for Supplier {
    fn from_draft(id: &str, draft: &SupplierFormInput, _existing: Option<&Self>) -> Self {
        Self {
            id: SupplierId::new(id),
            company_name: draft.company_name.trim().to_owned(),
            name: draft.name.clone(),
            mobile: draft.mobile.clone(),
            email: draft.email.clone(),
            address: draft.address.clone(),
            p_description: draft.p_description.clone(),
        }
    }
}

impl MemoryRecord for Order {
    fn from_draft(id: &str, draft: &OrderFormInput, existing: Option<&Self>) -> Self {
        let previous_driver = existing.and_then(|order| order.driver.clone());
        let driver = draft.driver_id.as_ref().map(|driver_id| {
            previous_driver
                .filter(|driver| &driver.id == driver_id)
                .unwrap_or_else(|| DriverRef {
                    id: driver_id.clone(),
                    first_name: "Driver".to_owned(),
                    last_name: driver_id.to_string(),
                })
        });
        Self {
            id: OrderId::new(id),
            created_at: existing.map_or_else(fixture_datetime, |order| order.created_at),
            status: draft.status.clone(),
            driver,
        }
    }

    fn matches_filter(&self, filter: &str) -> bool {
        self.status.as_str() == filter
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    List { filter: Option<String> },
    Create,
    Update { id: String },
    Delete { id: String },
}

impl RemoteCall {
    const fn op(&self) -> RemoteOp {
        match self {
            Self::List { .. } => RemoteOp::List,
            Self::Create => RemoteOp::Create,
            Self::Update { .. } => RemoteOp::Update,
            Self::Delete { .. } => RemoteOp::Delete,
        }
    }
}

#[derive(Debug)]
struct MemoryState<R: Resource> {
    rows: Vec<R>,
    calls: Vec<RemoteCall>,
    drafts: Vec<R::Draft>,
    failures: VecDeque<(RemoteOp, RemoteError)>,
    list_delays: HashMap<Option<String>, StdDuration>,
    next_id: u64,
}

/// In-process stand-in for a server collection. Clones share the same rows,
/// so a clone handed to a worker thread sees every write.
#[derive(Debug)]
pub struct MemoryRemote<R: Resource> {
    state: Arc<Mutex<MemoryState<R>>>,
}

impl<R: Resource> Clone for MemoryRemote<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: MemoryRecord> MemoryRemote<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                rows,
                calls: Vec::new(),
                drafts: Vec::new(),
                failures: VecDeque::new(),
                list_delays: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    pub fn rows(&self) -> Vec<R> {
        self.lock().rows.clone()
    }

    pub fn insert(&self, row: R) {
        self.lock().rows.push(row);
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.lock().calls.clone()
    }

    pub fn count(&self, op: RemoteOp) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.op() == op)
            .count()
    }

    /// Bodies received by create and update, in arrival order.
    pub fn drafts(&self) -> Vec<R::Draft> {
        self.lock().drafts.clone()
    }

    /// Makes the next call of kind `op` fail with `error`. Queued failures fire in order.
    pub fn fail_next(&self, op: RemoteOp, error: RemoteError) {
        self.lock().failures.push_back((op, error));
    }

    /// Holds every list with this filter for `delay` before answering.
    pub fn delay_list(&self, filter: Option<&str>, delay: StdDuration) {
        self.lock()
            .list_delays
            .insert(filter.map(str::to_owned), delay);
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState<R>> {
        self.state.lock().expect("memory remote lock poisoned")
    }

    fn record(&self, call: RemoteCall) -> Result<MutexGuard<'_, MemoryState<R>>, RemoteError> {
        let op = call.op();
        let mut state = self.lock();
        state.calls.push(call);
        if let Some(position) = state.failures.iter().position(|(kind, _)| *kind == op)
            && let Some((_, error)) = state.failures.remove(position)
        {
            return Err(error);
        }
        Ok(state)
    }
}

impl<R: MemoryRecord> RemoteCollection<R> for MemoryRemote<R> {
    fn list(&mut self, filter: Option<&str>) -> Result<Vec<R>, RemoteError> {
        let delay = self
            .lock()
            .list_delays
            .get(&filter.map(str::to_owned))
            .copied();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        let state = self.record(RemoteCall::List {
            filter: filter.map(str::to_owned),
        })?;
        Ok(state
            .rows
            .iter()
            .filter(|row| filter.is_none_or(|filter| row.matches_filter(filter)))
            .cloned()
            .collect())
    }

    fn create(&mut self, draft: &R::Draft) -> Result<(), RemoteError> {
        let mut state = self.record(RemoteCall::Create)?;
        state.next_id += 1;
        let id = format!("{}-new-{}", R::COLLECTION, state.next_id);
        state.drafts.push(draft.clone());
        state.rows.push(R::from_draft(&id, draft, None));
        Ok(())
    }

    fn update(&mut self, id: &R::Id, draft: &R::Draft) -> Result<(), RemoteError> {
        let mut state = self.record(RemoteCall::Update { id: id.to_string() })?;
        let Some(position) = state.rows.iter().position(|row| row.id() == id) else {
            return Err(RemoteError::rejected(404, format!("{} not found", R::LABEL)));
        };
        state.drafts.push(draft.clone());
        let updated = R::from_draft(&id.to_string(), draft, Some(&state.rows[position]));
        state.rows[position] = updated;
        Ok(())
    }

    fn delete(&mut self, id: &R::Id) -> Result<(), RemoteError> {
        let mut state = self.record(RemoteCall::Delete { id: id.to_string() })?;
        let before = state.rows.len();
        state.rows.retain(|row| row.id() != id);
        if state.rows.len() == before {
            return Err(RemoteError::rejected(404, format!("{} not found", R::LABEL)));
        }
        Ok(())
    }
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("config.toml");
    Ok((dir, path))
}

/// Creation time given to orders made through [`MemoryRemote`].
pub fn fixture_datetime() -> OffsetDateTime {
    midnight_utc(REFERENCE_YEAR, Month::February, 19) + Duration::hours(12)
}

fn midnight_utc(year: i32, month: Month, day: u8) -> OffsetDateTime {
    let date = Date::from_calendar_date(year, month, day).expect("valid calendar date");
    let midnight = Time::from_hms(0, 0, 0).expect("valid midnight");
    date.with_time(midnight).assume_utc()
}
