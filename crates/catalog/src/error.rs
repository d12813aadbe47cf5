#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    UnknownDomain(String),
    DuplicateDomain(String),
    MissingDomain(String),
    DuplicateOrder(u32),
    InvalidColor {
        domain: String,
        field: &'static str,
        value: String,
    },
    InvalidRoute {
        domain: String,
        route: String,
    },
    Parse(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::UnknownDomain(id) => write!(f, "unknown domain: {id:?}"),
            CatalogError::DuplicateDomain(id) => write!(f, "domain listed twice: {id}"),
            CatalogError::MissingDomain(id) => write!(f, "domain missing from table: {id}"),
            CatalogError::DuplicateOrder(order) => {
                write!(f, "two domains share sequence order {order}")
            }
            CatalogError::InvalidColor {
                domain,
                field,
                value,
            } => write!(f, "{domain}: colors.{field} is not a colour: {value:?}"),
            CatalogError::InvalidRoute { domain, route } => {
                write!(f, "{domain}: route must start with '/': {route:?}")
            }
            CatalogError::Parse(msg) => write!(f, "catalog parse error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    StorageUnavailable,
    Io(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::StorageUnavailable => write!(f, "session storage unavailable"),
            SessionError::Io(msg) => write!(f, "session storage error: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {}
