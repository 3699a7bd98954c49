use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Supplier, SupplierPayload};
use crate::utils::SearchQuery;

/// The inputs on the supplier page, by their element ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Id,
    Name,
    Rating,
    Address,
    Phone,
    Available,
    ProductList,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Id,
        FormField::Name,
        FormField::Rating,
        FormField::Address,
        FormField::Phone,
        FormField::Available,
        FormField::ProductList,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            FormField::Id => "supplier_id",
            FormField::Name => "supplier_name",
            FormField::Rating => "supplier_rating",
            FormField::Address => "supplier_address",
            FormField::Phone => "supplier_phone",
            FormField::Available => "supplier_available",
            FormField::ProductList => "supplier_product_list",
        }
    }

    fn short_name(self) -> &'static str {
        &self.element_id()["supplier_".len()..]
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

impl FromStr for FormField {
    type Err = Error;

    /// Accepts either the element id (`supplier_name`) or the short name (`name`).
    fn from_str(s: &str) -> Result<Self> {
        FormField::ALL
            .into_iter()
            .find(|f| f.element_id() == s || f.short_name() == s)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// One snapshot of the supplier form. Every field is the raw text the input
/// holds; `available` is `"true"`, `"false"` or empty and `product_list` is
/// JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub id: String,
    pub name: String,
    pub rating: String,
    pub address: String,
    pub phone: String,
    pub available: String,
    pub product_list: String,
}

impl FormState {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Id => &self.id,
            FormField::Name => &self.name,
            FormField::Rating => &self.rating,
            FormField::Address => &self.address,
            FormField::Phone => &self.phone,
            FormField::Available => &self.available,
            FormField::ProductList => &self.product_list,
        }
    }

    /// Returns a copy with `field` set to `value`.
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            FormField::Id => self.id = value,
            FormField::Name => self.name = value,
            FormField::Rating => self.rating = value,
            FormField::Address => self.address = value,
            FormField::Phone => self.phone = value,
            FormField::Available => self.available = value,
            FormField::ProductList => self.product_list = value,
        }
        self
    }

    pub fn is_available(&self) -> bool {
        self.available == "true"
    }

    /// Fills every field, id included, from a supplier returned by the service.
    pub fn from_supplier(supplier: &Supplier) -> Self {
        Self {
            id: supplier.id.clone(),
            name: supplier.name.clone(),
            rating: supplier.rating.clone(),
            address: supplier.address.clone(),
            phone: supplier.phone.clone(),
            available: supplier.available.to_string(),
            product_list: Value::Array(supplier.product_list.clone()).to_string(),
        }
    }

    /// Empties every field except the id.
    pub fn cleared(&self) -> Self {
        Self {
            id: self.id.clone(),
            ..Self::default()
        }
    }

    /// Empties every field including the id.
    pub fn reset() -> Self {
        Self::default()
    }

    /// Builds the create/update body. Fails without side effects when the
    /// product list is not a JSON array.
    pub fn to_payload(&self) -> Result<SupplierPayload> {
        let product_list: Vec<Value> =
            serde_json::from_str(&self.product_list).map_err(Error::InvalidProductList)?;

        Ok(SupplierPayload {
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            rating: self.rating.clone(),
            available: self.is_available(),
            product_list,
        })
    }

    pub fn search_query(&self) -> SearchQuery {
        SearchQuery::new()
            .text("name", &self.name)
            .text("phone", &self.phone)
            .text("address", &self.address)
            .text("rating", &self.rating)
            .flag("available", self.is_available())
    }
}
