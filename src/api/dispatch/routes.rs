//! Route declarations

use std::collections::HashMap;

use axum::{routing::MethodRouter, Router};

use super::error::GateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// JSON-RPC 2.0 call carried in a POST body
    JsonRpc,
    /// Any other HTTP exchange
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDeclaration {
    path: String,
    kind: RouteKind,
    requires_key: bool,
}

impl RouteDeclaration {
    pub fn jsonrpc(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: RouteKind::JsonRpc,
            requires_key: false,
        }
    }

    pub fn http(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: RouteKind::Http,
            requires_key: false,
        }
    }

    pub fn requiring_key(mut self) -> Self {
        self.requires_key = true;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn requires_key(&self) -> bool {
        self.requires_key
    }
}

/// What the gate must do for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    Open,
    KeyRequired,
}

/// Declarations by exact path
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    declarations: HashMap<String, RouteDeclaration>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, declaration: RouteDeclaration) {
        self.declarations
            .insert(declaration.path.clone(), declaration);
    }

    pub fn lookup(&self, path: &str) -> Option<&RouteDeclaration> {
        self.declarations.get(path)
    }

    /// Undeclared paths require a key and, not being JSON-RPC routes, can
    /// never present one.
    pub fn enforcement(&self, path: &str) -> Result<Enforcement, GateError> {
        match self.lookup(path) {
            Some(declaration) if !declaration.requires_key => Ok(Enforcement::Open),
            Some(declaration) if declaration.kind == RouteKind::JsonRpc => {
                Ok(Enforcement::KeyRequired)
            }
            _ => Err(GateError::ProtocolMismatch),
        }
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Builds the router and its route table side by side
#[derive(Debug)]
pub struct Routes<S> {
    table: RouteTable,
    router: Router<S>,
}

impl<S> Default for Routes<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            table: RouteTable::new(),
            router: Router::new(),
        }
    }
}

impl<S> Routes<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(mut self, declaration: RouteDeclaration, handler: MethodRouter<S>) -> Self {
        self.router = self.router.route(declaration.path(), handler);
        self.table.declare(declaration);
        self
    }

    pub fn into_parts(self) -> (RouteTable, Router<S>) {
        (self.table, self.router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table.declare(RouteDeclaration::jsonrpc("/rpc/open"));
        table.declare(RouteDeclaration::jsonrpc("/rpc/keyed").requiring_key());
        table.declare(RouteDeclaration::http("/health"));
        table.declare(RouteDeclaration::http("/status").requiring_key());
        table
    }

    #[test]
    fn test_unflagged_routes_are_open() {
        let table = table();
        assert_eq!(table.enforcement("/rpc/open").unwrap(), Enforcement::Open);
        assert_eq!(table.enforcement("/health").unwrap(), Enforcement::Open);
    }

    #[test]
    fn test_flagged_jsonrpc_route_requires_key() {
        assert_eq!(
            table().enforcement("/rpc/keyed").unwrap(),
            Enforcement::KeyRequired
        );
    }

    #[test]
    fn test_flagged_http_route_is_a_protocol_mismatch() {
        assert!(matches!(
            table().enforcement("/status"),
            Err(GateError::ProtocolMismatch)
        ));
    }

    #[test]
    fn test_undeclared_route_fails_closed() {
        assert!(matches!(
            table().enforcement("/nowhere"),
            Err(GateError::ProtocolMismatch)
        ));
    }

    #[test]
    fn test_routes_builder_fills_table() {
        let routes: Routes<()> = Routes::new()
            .declare(
                RouteDeclaration::jsonrpc("/rpc/a").requiring_key(),
                axum::routing::post(|| async { "a" }),
            )
            .declare(
                RouteDeclaration::http("/b"),
                axum::routing::get(|| async { "b" }),
            );

        let (table, _router) = routes.into_parts();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("/rpc/a").unwrap().kind(), RouteKind::JsonRpc);
        assert!(table.lookup("/rpc/a").unwrap().requires_key());
    }
}
