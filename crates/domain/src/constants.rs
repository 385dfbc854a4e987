//! SDK constants
//!
//! Centralized location for configuration keys, retry budgets and protocol
//! literals shared by the core and infrastructure crates.

// Configuration keys
pub const CLIENT_ID: &str = "clientId";
pub const CLIENT_SECRET: &str = "clientSecret";
pub const URL_BASE: &str = "urlBase";
pub const SCOPES: &str = "scopes";
pub const AUDIENCE: &str = "audience";
pub const IAM_TOKEN: &str = "iamToken";
pub const IAM_TOKEN_SCOPES: &str = "iamScopes";
pub const IAM_DOMAIN: &str = "domain";
pub const CUSTOM_DOMAIN: &str = "customDomain";

/// Suffix appended to a module name to form its endpoint override key.
pub const ENDPOINT_SUFFIX: &str = "Endpoint";
/// Suffix appended to a module name to form its port override key.
pub const PORT_SUFFIX: &str = "Port";

// URL template placeholders
pub const URL_BASE_PLACEHOLDER: &str = "{{module}}";
pub const URL_BASE_PORT_PLACEHOLDER: &str = "{{modulePort}}";

// Retry bookkeeping (stored in the client config)
pub const UNAUTHORIZED_NUM_RETRIES: &str = "un_r";
pub const UNAUTHORIZED_MAX_RETRIES: u64 = 1;
pub const UNAUTHORIZED_STATUS_CODE: u16 = 401;
pub const FORCE_UPDATE_STATUS: &str = "fu_r";
pub const FORCE_UPDATE_MAX_RETRIES: u64 = 3;
pub const FORCE_UPDATE_STATUS_CODE: u16 = 403;
pub const FORCE_UPDATE_TEXT: &str = "unsupported_version";

// Content negotiation
pub const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const DEFAULT_ACCEPT: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

// Header names
pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_NO_REDIRECT: &str = "No-Redirect";
pub const HEADER_REQUEST_COOKIE: &str = "RequestCookie";
pub const HEADER_METHOD_OVERRIDE: &str = "X-HTTP-Method-Override";

/// GET requests with a longer URL are tunnelled through POST.
pub const METHOD_OVERRIDE_URL_LENGTH: usize = 2048;

// Identity module token exchange
pub const IAM_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const IAM_DEFAULT_AUDIENCE: &str = "http://iam.bqws.io";
pub const IAM_TOKEN_URI: &str = "oauth/token";
pub const UNAUTHENTICATED_DOMAIN: &str = "unauthenticated";

/// Lifetime added to generated assertions without an explicit `exp` claim.
pub const JWT_EXPIRATION_SECS: i64 = 3500;
