//! Rolodex: multi-tenant sales CRM core.
//!
//! This crate implements the invariant-preserving logic behind a team-scoped
//! CRM: contact follow-up reconciliation, a staged deal pipeline with
//! gap-method ordering, and the tenant isolation guard that every operation
//! composes. The HTTP layer, request validation, and response shaping live
//! outside this crate and call into it with an explicit tenant context.
//!
//! # Architecture
//!
//! Rolodex follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`tenant`]: Tenant identity and the cross-tenant access guard
//! - [`followup`]: Contacts, tasks, and follow-up reconciliation
//! - [`pipeline`]: Deals, stage transitions, and board ordering

pub mod followup;
pub mod pipeline;
pub mod tenant;
