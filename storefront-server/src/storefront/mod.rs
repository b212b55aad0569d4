//! Storefront Composition
//!
//! Turns a tenant's page definition into a renderable page:
//!
//! - [`resolver`] - per-section strategies (smart rules, manual picks,
//!   category grids, navigation merging, locations, static config)
//! - [`hydrator`] - concurrent, failure-isolated resolution of the ordered
//!   section list

pub mod hydrator;
pub mod resolver;

pub use hydrator::{HydratedPage, HydratedSection, HydrationOrchestrator};
pub use resolver::{ResolveError, SectionData, SectionResolver};
