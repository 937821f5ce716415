//! PingOne entities as the management API returns them.

pub mod application;
pub mod directory;
pub mod environment;
pub mod population;

pub use application::{Application, OidcApplicationRequest};
pub use directory::{IdentityCountQuery, TotalIdentities};
pub use environment::{
    BillOfMaterials, CreateEnvironmentRequest, EntityRef, Environment, EnvironmentId,
    EnvironmentType, Product, UpdateEnvironmentRequest,
};
pub use population::{Population, PopulationRequest};
