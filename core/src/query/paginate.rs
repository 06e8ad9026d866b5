//! Length-aware and simple pagination.

use crate::error::{Result, StrataError};
use crate::model::Model;
use crate::pagination::{LengthAwarePaginator, PageLinks, Paginator};
use crate::remote::RemoteQuery;

use super::{Query, Select};

impl<M: Model> Query<M> {
    /// Picks the explicit page when it is at least 1, then the resolver's,
    /// then page 1.
    fn resolve_page(&self, page_name: &str, page: Option<usize>) -> usize {
        page.filter(|&p| p >= 1)
            .or_else(|| self.context.resolver().resolve_current_page(page_name))
            .filter(|&p| p >= 1)
            .unwrap_or(1)
    }

    /// The explicit page size, or the configured one. Zero is rejected.
    fn resolve_per_page(&self, per_page: Option<usize>) -> Result<usize> {
        match per_page.unwrap_or(self.context.config().per_page) {
            0 => Err(StrataError::InvalidPageSize),
            n => Ok(n),
        }
    }

    fn page_links(&self, page_name: &str) -> PageLinks {
        PageLinks {
            path: self.context.resolver().resolve_current_path(),
            page_name: page_name.to_owned(),
        }
    }

    fn apply_window(&mut self, per_page: usize, page: usize, select: Select) -> Result<()> {
        self.remote.limit(per_page);
        self.remote.skip((page - 1).saturating_mul(per_page));
        self.apply_select(select)
    }

    /// One page of results plus the total match count.
    ///
    /// The total comes from a clone taken before the window is applied, so
    /// limit, skip and projection never affect it. `None` for `per_page` or
    /// `page_name` falls back to the configured defaults.
    pub fn paginate(
        mut self,
        per_page: Option<usize>,
        select: impl Into<Select>,
        page_name: Option<&str>,
        page: Option<usize>,
    ) -> Result<LengthAwarePaginator<M>> {
        let per_page = self.resolve_per_page(per_page)?;
        let page_name = page_name
            .map(str::to_owned)
            .unwrap_or_else(|| self.context.config().page_name.clone());
        let page = self.resolve_page(&page_name, page);

        let count_query = self.remote.clone();
        crate::strata_trace_fetch!("count", self.class_name, self.use_master_key);
        let total = count_query.count(self.use_master_key)?;

        self.apply_window(per_page, page, select.into())?;

        crate::strata_trace_fetch!("find", self.class_name, self.use_master_key);
        let objects = self.remote.find(self.use_master_key)?;
        let items = self.create_models(objects)?;

        Ok(LengthAwarePaginator::new(
            items,
            total,
            per_page,
            page,
            self.page_links(&page_name),
        ))
    }

    /// One page of results without counting.
    pub fn simple_paginate(
        self,
        per_page: Option<usize>,
        select: impl Into<Select>,
        page_name: Option<&str>,
        page: Option<usize>,
    ) -> Result<Paginator<M>> {
        let per_page = self.resolve_per_page(per_page)?;
        let page_name = page_name
            .map(str::to_owned)
            .unwrap_or_else(|| self.context.config().page_name.clone());
        let page = self.resolve_page(&page_name, page);

        let mut items_query = self.clone();
        items_query.apply_window(per_page, page, select.into())?;

        crate::strata_trace_fetch!("find", self.class_name, self.use_master_key);
        let objects = items_query.remote.find(self.use_master_key)?;
        let items = self.create_models(objects)?;

        Ok(Paginator::new(
            items,
            per_page,
            page,
            self.page_links(&page_name),
        ))
    }
}
