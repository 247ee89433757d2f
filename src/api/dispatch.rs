//! Declarative endpoint dispatch
//!
//! Every envelope endpoint is a zero-sized type implementing [`Endpoint`]:
//! it names its path parameters, payload types, response id policy and the
//! one service call it makes. Two generic handlers serve all of them:
//! [`retrieve`] for endpoints without a request body and [`submit`] for
//! endpoints that take a `RequestWrapper`. Controllers publish their
//! endpoints as a `Vec<Route>` table which is folded into the router.

use std::fmt;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, State},
    routing::{on, MethodFilter, MethodRouter},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use validator::Validate;

use super::state::AppState;
use super::types::{ApiError, Envelope, ResponseWrapper, RESPONSE_VERSION};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_endpoint_outcome;

/// How an endpoint picks the `id`/`version` of its response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseId {
    /// Echo the request envelope's `id` and `version`
    Echo,
    /// Answer with a fixed id and version `1.0`
    Fixed(&'static str),
}

impl ResponseId {
    /// Resolve the response `id`/`version`, given the request's when there is one
    pub fn resolve(self, request: Option<(&str, &str)>) -> (String, String) {
        match (self, request) {
            (Self::Fixed(id), _) => (id.to_string(), RESPONSE_VERSION.to_string()),
            (Self::Echo, Some((id, version))) => (id.to_string(), version.to_string()),
            (Self::Echo, None) => (String::new(), RESPONSE_VERSION.to_string()),
        }
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Echo => write!(f, "echo"),
            Self::Fixed(id) => write!(f, "{}", id),
        }
    }
}

/// HTTP methods used by the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
}

impl Verb {
    fn filter(self) -> MethodFilter {
        match self {
            Self::Get => MethodFilter::GET,
            Self::Post => MethodFilter::POST,
            Self::Put => MethodFilter::PUT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One envelope endpoint and the single service call behind it
#[async_trait]
pub trait Endpoint: Send + Sync + 'static {
    /// Operation name used in logs and the route listing
    const NAME: &'static str;
    const VERB: Verb;
    /// Full path template, e.g. `/partners/{partnerID}`
    const PATH: &'static str;
    const RESPONSE_ID: ResponseId;
    /// Copy the request envelope's metadata onto the response
    const CARRY_METADATA: bool = false;

    /// Path variables, passed through as opaque strings
    type Params: FromRequestParts<AppState, Rejection: fmt::Display + Send> + Send + 'static;
    /// Request payload; `()` for endpoints without a body
    type Body: Send + 'static;
    type Output: Serialize + Send + 'static;

    async fn invoke(
        state: &AppState,
        params: Self::Params,
        body: Self::Body,
    ) -> Result<Self::Output, DomainError>;
}

/// Handler for endpoints without a request body
pub async fn retrieve<E>(
    params: ParamsResult<E>,
    State(state): State<AppState>,
) -> Result<Json<ResponseWrapper<E::Output>>, ApiError>
where
    E: Endpoint<Body = ()>,
{
    let (id, version) = E::RESPONSE_ID.resolve(None);
    debug!(endpoint = E::NAME, "Dispatching retrieval");

    let params = match params {
        Ok(params) => params,
        Err(rejection) => return Err(rejected::<E>(rejection, id, version)),
    };

    match E::invoke(&state, params, ()).await {
        Ok(output) => {
            record_endpoint_outcome(E::NAME, "success");
            Ok(Json(ResponseWrapper::success(id, version, output)))
        }
        Err(e) => Err(failure::<E>(e, id, version)),
    }
}

/// Handler for endpoints that take a request envelope
pub async fn submit<E>(
    params: ParamsResult<E>,
    State(state): State<AppState>,
    Envelope(wrapper): Envelope<E::Body>,
) -> Result<Json<ResponseWrapper<E::Output>>, ApiError>
where
    E: Endpoint,
    E::Body: DeserializeOwned + Validate,
{
    let (id, version) = E::RESPONSE_ID.resolve(Some((wrapper.id(), wrapper.version())));
    let metadata = if E::CARRY_METADATA {
        wrapper.metadata().cloned()
    } else {
        None
    };
    debug!(endpoint = E::NAME, request_id = %wrapper.id(), "Dispatching submission");

    let params = match params {
        Ok(params) => params,
        Err(rejection) => return Err(rejected::<E>(rejection, id, version)),
    };

    match E::invoke(&state, params, wrapper.into_request()).await {
        Ok(output) => {
            record_endpoint_outcome(E::NAME, "success");
            Ok(Json(
                ResponseWrapper::success(id, version, output).with_metadata(metadata),
            ))
        }
        Err(e) => Err(failure::<E>(e, id, version)),
    }
}

/// Path extraction outcome, so a bad path still gets an envelope response
type ParamsResult<E> = Result<
    <E as Endpoint>::Params,
    <<E as Endpoint>::Params as FromRequestParts<AppState>>::Rejection,
>;

fn rejected<E: Endpoint>(
    rejection: impl fmt::Display,
    id: String,
    version: String,
) -> ApiError {
    let err = DomainError::validation(format!("Invalid path parameter: {}", rejection));
    failure::<E>(err, id, version)
}

fn failure<E: Endpoint>(err: DomainError, id: String, version: String) -> ApiError {
    warn!(endpoint = E::NAME, error = %err, "Endpoint failed");
    let error = ApiError::from(err).with_envelope(id, version);
    record_endpoint_outcome(E::NAME, &error.error.error_code);
    error
}

/// An entry of a controller's route table
pub struct Route {
    pub verb: Verb,
    pub path: &'static str,
    pub name: &'static str,
    pub response_id: ResponseId,
    pub takes_envelope: bool,
    handler: MethodRouter<AppState>,
}

impl Route {
    /// Route served by [`retrieve`]
    pub fn retrieve<E>() -> Self
    where
        E: Endpoint<Body = ()>,
    {
        Self {
            verb: E::VERB,
            path: E::PATH,
            name: E::NAME,
            response_id: E::RESPONSE_ID,
            takes_envelope: false,
            handler: on(E::VERB.filter(), retrieve::<E>),
        }
    }

    /// Route served by [`submit`]
    pub fn submit<E>() -> Self
    where
        E: Endpoint,
        E::Body: DeserializeOwned + Validate,
    {
        Self {
            verb: E::VERB,
            path: E::PATH,
            name: E::NAME,
            response_id: E::RESPONSE_ID,
            takes_envelope: true,
            handler: on(E::VERB.filter(), submit::<E>),
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("verb", &self.verb)
            .field("path", &self.path)
            .field("name", &self.name)
            .field("response_id", &self.response_id)
            .field("takes_envelope", &self.takes_envelope)
            .finish()
    }
}

/// Register a route table; routes sharing a path are merged by method
pub fn mount(router: Router<AppState>, routes: Vec<Route>) -> Router<AppState> {
    routes
        .into_iter()
        .fold(router, |router, route| router.route(route.path, route.handler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_id_resolution() {
        assert_eq!(
            ResponseId::Echo.resolve(Some(("req.id", "2.1"))),
            ("req.id".to_string(), "2.1".to_string())
        );
        assert_eq!(
            ResponseId::Fixed("fixed.id").resolve(Some(("req.id", "2.1"))),
            ("fixed.id".to_string(), "1.0".to_string())
        );
        assert_eq!(
            ResponseId::Echo.resolve(None),
            (String::new(), "1.0".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ResponseId::Echo.to_string(), "echo");
        assert_eq!(ResponseId::Fixed("a.b").to_string(), "a.b");
        assert_eq!(Verb::Put.to_string(), "PUT");
    }
}
