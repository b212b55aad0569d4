//! Storefront Composition Server - multi-tenant storefront backend
//!
//! # Architecture overview
//!
//! The core of this service is dynamic page composition:
//!
//! - **Smart Rule Engine** (`rules`): declarative product-selection rules
//!   (best sellers, clearance, dead stock, manual picks, custom filters)
//!   with validation, tenant-scoped query building and TTL caching
//! - **Hydration Orchestrator** (`storefront`): concurrent, failure-isolated
//!   resolution of a page's section list into renderable data
//! - **Database** (`db`): embedded SurrealDB models and repositories
//! - **HTTP API** (`api`): thin RESTful controllers
//!
//! # Module structure
//!
//! ```text
//! storefront-server/src/
//! ├── core/          # config, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── rules/         # smart rule engine
//! ├── storefront/    # section resolvers + hydration
//! ├── db/            # database layer
//! └── utils/         # errors, logging, helpers
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod rules;
pub mod storefront;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use crate::rules::engine::{RuleParams, SmartRuleEngine};
pub use crate::rules::transform::ResolvedProduct;
pub use crate::rules::validator::{FilterValidator, ValidationError};
pub use crate::storefront::hydrator::{HydratedPage, HydratedSection, HydrationOrchestrator};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   _____ __                  ____                 __
  / ___// /_____  ________  / __/________  ____  / /_
  \__ \/ __/ __ \/ ___/ _ \/ /_/ ___/ __ \/ __ \/ __/
 ___/ / /_/ /_/ / /  /  __/ __/ /  / /_/ / / / / /_
/____/\__/\____/_/   \___/_/ /_/   \____/_/ /_/\__/
    "#
    );
}
