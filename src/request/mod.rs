//! Search request builder
//!
//! [`QueryBuilder`] accumulates the query text, paging, ordering, requested
//! properties/facets and constraints, then compiles them into a
//! [`SearchRequest`] document and optionally sends it.
//!
//! Pages beyond the first can only be requested with the continuation token
//! stored by the response of an earlier page of the same query.

mod order;
mod wire;

pub use order::{OrderDirection, OrderField};
pub use wire::{
    Format, PageSelection, QueryExpression, RequestedField, ResultPages, SearchRequest,
    SourceContext, UnparsedQuery, UserQuery,
};

use crate::config::Config;
use crate::constraints::{Constraint, ConstraintKind, FilterDocument};
use crate::error::{MindbreezeError, Result};
use crate::http::{HttpClient, PostRequest};
use crate::response::{HttpErrorPolicy, NormalizedResponse, ResponseNormalizer};
use crate::session::PaginationSession;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Label of the date metadata used by [`QueryBuilder::add_date_constraint`]
pub const DATE_LABEL: &str = "mes:date";

/// Label datasource constraints restrict on
pub const DATASOURCE_LABEL: &str = "fqcategory";

pub struct QueryBuilder {
    url: String,
    http: Arc<dyn HttpClient>,
    session: PaginationSession,
    http_error_policy: HttpErrorPolicy,

    query: String,
    /// Base64 of `query`; binds continuation tokens to the query
    encoded_query: String,
    properties: Vec<String>,
    facets: Vec<String>,

    page: u64,
    per_page: u32,
    page_count: u32,
    alternatives: u32,
    content_sample_length: u32,

    order_field: OrderField,
    order_direction: OrderDirection,

    /// Known datasource constraints: name -> datasource ids
    datasource_constraints: BTreeMap<String, Vec<String>>,
    datasource_constraint: Option<FilterDocument>,
    query_constraints: Vec<FilterDocument>,
}

impl QueryBuilder {
    pub fn new(
        url: impl Into<String>,
        http: Arc<dyn HttpClient>,
        session: PaginationSession,
    ) -> Self {
        Self {
            url: url.into(),
            http,
            session,
            http_error_policy: HttpErrorPolicy::default(),
            query: String::new(),
            encoded_query: String::new(),
            properties: Vec::new(),
            facets: Vec::new(),
            page: 1,
            per_page: 10,
            page_count: 10,
            alternatives: 10,
            content_sample_length: 300,
            order_field: OrderField::default(),
            order_direction: OrderDirection::default(),
            datasource_constraints: BTreeMap::new(),
            datasource_constraint: None,
            query_constraints: Vec::new(),
        }
    }

    /// Builder seeded with the endpoint, request defaults, datasource
    /// constraints and error policy from `config`
    pub fn from_config(
        config: &Config,
        http: Arc<dyn HttpClient>,
        session: PaginationSession,
    ) -> Self {
        let mut builder = Self::new(config.endpoint.url.clone(), http, session);
        builder
            .set_per_page(config.request.per_page)
            .set_page_count(config.request.page_count)
            .set_alternatives(config.request.alternatives)
            .set_content_sample_length(config.request.content_sample_length)
            .set_properties(config.request.properties.clone())
            .set_facets(config.request.facets.clone())
            .set_datasource_constraints(config.datasources.clone())
            .set_http_error_policy(config.http_error_policy());
        builder
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> &mut Self {
        self.query = query.into();
        self.encoded_query = BASE64.encode(self.query.as_bytes());
        self
    }

    /// Pages are 1-based; anything below 1 selects the first page
    pub fn set_page(&mut self, page: i64) -> &mut Self {
        self.page = u64::try_from(page).ok().filter(|p| *p > 0).unwrap_or(1);
        self
    }

    pub fn set_per_page(&mut self, per_page: u32) -> &mut Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn set_page_count(&mut self, page_count: u32) -> &mut Self {
        self.page_count = page_count;
        self
    }

    pub fn set_alternatives(&mut self, alternatives: u32) -> &mut Self {
        self.alternatives = alternatives;
        self
    }

    pub fn set_content_sample_length(&mut self, length: u32) -> &mut Self {
        self.content_sample_length = length;
        self
    }

    pub fn add_property(&mut self, name: impl Into<String>) -> &mut Self {
        self.properties.push(name.into());
        self
    }

    pub fn set_properties(&mut self, names: Vec<String>) -> &mut Self {
        self.properties = names;
        self
    }

    pub fn add_facet(&mut self, name: impl Into<String>) -> &mut Self {
        self.facets.push(name.into());
        self
    }

    pub fn set_facets(&mut self, names: Vec<String>) -> &mut Self {
        self.facets = names;
        self
    }

    pub fn set_http_error_policy(&mut self, policy: HttpErrorPolicy) -> &mut Self {
        self.http_error_policy = policy;
        self
    }

    /// Replace the known datasource constraints
    pub fn set_datasource_constraints(
        &mut self,
        constraints: BTreeMap<String, Vec<String>>,
    ) -> &mut Self {
        self.datasource_constraints = constraints;
        self
    }

    /// Order results by `field` (`relevance` or `date`), descending
    pub fn set_order_by(&mut self, field: &str) -> Result<&mut Self> {
        self.set_order(field, OrderDirection::Descending.name())
    }

    /// Order results by `field` in `direction` (`asc` or `desc`)
    ///
    /// Both names are matched case-insensitively.
    pub fn set_order(&mut self, field: &str, direction: &str) -> Result<&mut Self> {
        let field: OrderField = field.parse()?;
        let direction: OrderDirection = direction.parse()?;

        self.order_field = field;
        self.order_direction = direction;
        Ok(self)
    }

    /// Restrict the search to the datasources registered under `name`
    ///
    /// Unknown names are ignored. A later call replaces the earlier scope.
    pub fn add_datasource_constraint(&mut self, name: &str) -> Result<&mut Self> {
        let Some(datasources) = self.datasource_constraints.get(name) else {
            tracing::debug!("Ignoring unknown datasource constraint: {}", name);
            return Ok(self);
        };

        let values = Value::from(datasources.clone());
        let constraint = Constraint::term(DATASOURCE_LABEL).create(&values)?;
        self.datasource_constraint = Some(constraint.compile());
        Ok(self)
    }

    /// Restrict results to documents dated between `from` and `to`
    /// (Unix seconds, inclusive)
    pub fn add_date_constraint(&mut self, from: i64, to: i64) -> Result<&mut Self> {
        self.add_constraint(
            DATE_LABEL,
            ConstraintKind::BetweenDates.as_str(),
            &Value::from(vec![from, to]),
        )
    }

    pub fn add_date_range(&mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<&mut Self> {
        self.add_date_constraint(from.timestamp(), to.timestamp())
    }

    /// Add a constraint of type `kind` (`between_dates`, `regex` or `term`)
    /// on `label`
    pub fn add_constraint(&mut self, label: &str, kind: &str, data: &Value) -> Result<&mut Self> {
        let kind: ConstraintKind = kind.parse()?;
        let constraint = Constraint::new(kind, label).create(data)?;
        if constraint.is_empty() {
            return Err(MindbreezeError::invalid_argument(format!(
                "No values passed to {} constraint on {}",
                kind, label
            )));
        }
        self.query_constraints.push(constraint.compile());
        Ok(self)
    }

    /// Assemble the request document from the current state
    ///
    /// # Errors
    /// `PaginationState` when a page beyond the first is requested and the
    /// session holds no continuation token for the current query.
    pub fn compile_data(&self) -> Result<SearchRequest> {
        let result_pages = if self.page > 1 {
            Some(ResultPages {
                qeng_ids: self.session.vars_for(&self.encoded_query)?,
                pages: PageSelection::single(self.page, self.per_page),
            })
        } else {
            None
        };

        Ok(SearchRequest {
            content_sample_length: self.content_sample_length,
            user: UserQuery {
                query: QueryExpression::unparsed(self.query.clone()),
                constraints: self.query_constraints.clone(),
            },
            count: self.per_page,
            max_page_count: self.page_count,
            alternatives_query_spelling_max_estimated_count: self.alternatives,
            order_direction: self.order_direction,
            orderby: self.order_field,
            properties: self
                .properties
                .iter()
                .map(|name| RequestedField::property(name.clone()))
                .collect(),
            facets: self
                .facets
                .iter()
                .map(|name| RequestedField::facet(name.clone()))
                .collect(),
            source_context: self
                .datasource_constraint
                .clone()
                .map(|constraints| SourceContext { constraints }),
            result_pages,
        })
    }

    /// Send the compiled request and normalize the response
    pub fn send(&self) -> Result<NormalizedResponse> {
        let data = self.compile_data()?;
        let body = serde_json::to_string(&data).map_err(|e| MindbreezeError::Json {
            source: e,
            context: "Failed to serialize search request".to_string(),
        })?;

        tracing::debug!(
            "Sending search for page {} of {:?} to {}",
            self.page,
            self.query,
            self.url
        );

        let response = self.http.post(&self.url, PostRequest::json(body))?;
        self.normalizer().normalize(&self.encoded_query, response)
    }

    /// Normalizer sharing this builder's session and error policy
    pub fn normalizer(&self) -> ResponseNormalizer {
        ResponseNormalizer::new(self.session.clone(), self.http_error_policy)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn encoded_query(&self) -> &str {
        &self.encoded_query
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn order(&self) -> (OrderField, OrderDirection) {
        (self.order_field, self.order_direction)
    }

    pub fn session(&self) -> &PaginationSession {
        &self.session
    }
}
