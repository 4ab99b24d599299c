//! Local view of the inventory.
//!
//! The server stays the source of truth. The local list is replaced wholesale
//! by every successful [`SweetCatalog::refresh`]; in between, mutations patch
//! it in place so the display reflects them without a round trip.

use crate::api::SweetApi;
use crate::error::ClientError;
use std::collections::BTreeSet;
use sweetshop_core::api_types::{CreateSweetRequest, SearchParams};
use sweetshop_core::{Price, Sweet, SweetId, SweetPatch};

/// Category menu entry meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Filters as a user edits them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub name: String,
    /// `None` or [`ALL_CATEGORIES`] disables the category filter.
    pub category: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
}

impl Filters {
    /// Query parameters for the search endpoint, blanks and "All" removed.
    pub fn to_params(&self) -> SearchParams {
        let category = self
            .category
            .clone()
            .filter(|c| !c.trim().eq_ignore_ascii_case(ALL_CATEGORIES));
        SearchParams {
            name: Some(self.name.clone()),
            category,
            min_price: self.min_price,
            max_price: self.max_price,
        }
        .normalized()
    }

    pub fn is_active(&self) -> bool {
        !self.to_params().is_empty()
    }
}

pub struct SweetCatalog<A> {
    api: A,
    sweets: Vec<Sweet>,
    filters: Filters,
}

impl<A: SweetApi> SweetCatalog<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            sweets: Vec::new(),
            filters: Filters::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn sweets(&self) -> &[Sweet] {
        &self.sweets
    }

    pub fn find(&self, id: SweetId) -> Option<&Sweet> {
        self.sweets.iter().find(|s| s.id == id)
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
    }

    pub fn set_name_filter(&mut self, name: impl Into<String>) {
        self.filters.name = name.into();
    }

    /// Fetch from the server: search when any filter is active, list
    /// otherwise. The result replaces the local list.
    pub async fn refresh(&mut self) -> Result<&[Sweet], ClientError> {
        let sweets = if self.filters.is_active() {
            self.api.search(&self.filters.to_params()).await?
        } else {
            self.api.list().await?
        };
        tracing::debug!(count = sweets.len(), "catalog refreshed");
        self.sweets = sweets;
        Ok(&self.sweets)
    }

    /// Buy `quantity` units. On success the local quantity drops by the same
    /// amount (never below zero) rather than taking the server's figure; the
    /// next refresh reconciles any drift.
    pub async fn purchase(&mut self, id: SweetId, quantity: u32) -> Result<Sweet, ClientError> {
        let sweet = self.api.purchase(id, quantity).await?;
        if let Some(local) = self.sweets.iter_mut().find(|s| s.id == id) {
            local.quantity = local.quantity.saturating_sub(quantity);
        }
        Ok(sweet)
    }

    pub async fn add(&mut self, request: &CreateSweetRequest) -> Result<Sweet, ClientError> {
        let sweet = self.api.create(request).await?;
        self.sweets.push(sweet.clone());
        Ok(sweet)
    }

    pub async fn update(&mut self, id: SweetId, patch: &SweetPatch) -> Result<Sweet, ClientError> {
        let sweet = self.api.update(id, patch).await?;
        self.replace(&sweet);
        Ok(sweet)
    }

    pub async fn delete(&mut self, id: SweetId) -> Result<(), ClientError> {
        self.api.delete(id).await?;
        self.sweets.retain(|s| s.id != id);
        Ok(())
    }

    pub async fn restock(&mut self, id: SweetId, quantity: u32) -> Result<Sweet, ClientError> {
        let sweet = self.api.restock(id, quantity).await?;
        self.replace(&sweet);
        Ok(sweet)
    }

    /// Distinct categories of the local list, sorted, for filter menus.
    pub fn categories(&self) -> Vec<String> {
        self.sweets
            .iter()
            .map(|s| s.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn replace(&mut self, sweet: &Sweet) {
        if let Some(local) = self.sweets.iter_mut().find(|s| s.id == sweet.id) {
            *local = sweet.clone();
        }
    }
}
