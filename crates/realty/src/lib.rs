//! Property browse and lead capture for the Hyderabad realty consultancy.
//!
//! The crate is split along the request path: [`query`] turns optional browse
//! parameters into a store [`Filter`](store::Filter), [`listings`] and [`leads`] are the
//! two services, and [`router`] exposes them over HTTP. Persistence goes through the
//! [`store::DocumentStore`] trait.

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod leads;
pub mod listings;
pub mod query;
pub mod router;
pub mod schema;
pub mod store;
pub mod telemetry;

pub use leads::{LeadIntake, LeadReceipt, LeadStatus};
pub use listings::{PropertyCatalog, PropertyListing, PropertyPage};
pub use query::{build_filter, PropertyQuery};
pub use router::{realty_router, RealtyState};
