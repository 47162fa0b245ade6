//! Caller identity attached to each dispatched request

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Serialize;

use crate::domain::{ApiKeyId, PrincipalId, RouteId};
use crate::infrastructure::api_key::Resolution;

/// Who a request acts as. Anonymous on routes that do not require a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallerContext {
    pub user: Option<PrincipalId>,
    pub route: Option<RouteId>,
    pub key_id: Option<ApiKeyId>,
}

impl CallerContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_resolution(resolution: &Resolution) -> Self {
        Self {
            user: Some(resolution.key.owner().clone()),
            route: resolution.route.as_ref().map(|r| *r.id()),
            key_id: Some(*resolution.key.id()),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }
}

impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CallerContext>()
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApiKey;

    #[test]
    fn test_from_resolution() {
        let key = ApiKey::new("abc", PrincipalId::new("demo").unwrap())
            .unwrap()
            .with_routes(&["/a"])
            .unwrap();
        let route = key.route_for("/a").cloned();
        let resolution = Resolution {
            key: key.clone(),
            route: route.clone(),
        };

        let context = CallerContext::from_resolution(&resolution);

        assert!(!context.is_anonymous());
        assert_eq!(context.user.unwrap().as_str(), "demo");
        assert_eq!(context.key_id, Some(*key.id()));
        assert_eq!(context.route, route.map(|r| *r.id()));
    }

    #[test]
    fn test_anonymous() {
        let context = CallerContext::anonymous();
        assert!(context.is_anonymous());
        assert!(context.key_id.is_none());
    }
}
