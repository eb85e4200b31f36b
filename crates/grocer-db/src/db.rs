//! Database handle and table queries.

use crate::{DbError, Order};
use grocer_data::{ClientRequestBuilder, FetchClient};
use serde::de::DeserializeOwned;
use serde::Serialize;

const REST_PATH: &str = "/rest/v1";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Handle on the hosted database's REST endpoint.
///
/// Every request carries the project's anon key as `apikey`, and the
/// signed-in user's access token (or the anon key when signed out) as the
/// bearer token, so row-level security sees the caller.
#[derive(Debug, Clone)]
pub struct Db {
    client: FetchClient,
    anon_key: String,
    access_token: Option<String>,
}

impl Db {
    /// Create a handle. `client` must already carry the backend base URL.
    pub fn new(client: FetchClient, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            anon_key: anon_key.into(),
            access_token: None,
        }
    }

    /// Act as a signed-in user.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Start a query against `table`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let products: Vec<Product> = db
    ///     .from("products")
    ///     .select("*")
    ///     .order(Order::asc("category"))
    ///     .fetch()
    ///     .await?;
    /// ```
    pub fn from(&self, table: impl Into<String>) -> Table<'_> {
        Table {
            db: self,
            table: table.into(),
            select: None,
            order: Vec::new(),
        }
    }

    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }

    fn authorize(&self, request: ClientRequestBuilder) -> ClientRequestBuilder {
        request
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(self.bearer())
    }
}

/// A query under construction against one table.
#[derive(Debug)]
pub struct Table<'a> {
    db: &'a Db,
    table: String,
    select: Option<String>,
    order: Vec<Order>,
}

impl<'a> Table<'a> {
    /// Columns to return, e.g. `"*"` or `"id,name"`.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    /// Add a sort key. Keys apply in the order they are added.
    pub fn order(mut self, order: Order) -> Self {
        self.order.push(order);
        self
    }

    /// Fetch all matching rows.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, DbError> {
        tracing::debug!(table = %self.table, "select");
        let request = self.read_request();
        Ok(request.send_json().await?)
    }

    /// Insert one row and return it as created, with server defaults filled in.
    pub async fn insert_one<B, T>(self, row: &B) -> Result<T, DbError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        tracing::debug!(table = %self.table, "insert single");
        let request = self
            .write_request()
            .header("Prefer", "return=representation")
            .accept(SINGLE_OBJECT)
            .json(row)?;
        Ok(request.send_json().await?)
    }

    /// Insert `rows` without reading anything back.
    pub async fn insert_all<B: Serialize>(self, rows: &[B]) -> Result<(), DbError> {
        tracing::debug!(table = %self.table, rows = rows.len(), "insert (minimal)");
        if rows.is_empty() {
            return Ok(());
        }
        let request = self
            .write_request()
            .header("Prefer", "return=minimal")
            .json(rows)?;
        Ok(request.send_empty().await?)
    }

    fn path(&self) -> String {
        format!("{}/{}", REST_PATH, self.table)
    }

    fn read_request(&self) -> ClientRequestBuilder {
        let mut request = self.db.authorize(self.db.client.get(self.path()));
        request = request.query("select", self.select.as_deref().unwrap_or("*"));
        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(Order::to_string)
                .collect::<Vec<_>>()
                .join(",");
            request = request.query("order", order);
        }
        request
    }

    fn write_request(&self) -> ClientRequestBuilder {
        let mut request = self.db.authorize(self.db.client.post(self.path()));
        if let Some(select) = &self.select {
            request = request.query("select", select.as_str());
        }
        request
    }
}
