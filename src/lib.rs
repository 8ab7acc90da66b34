//! Taskloom: personal task-management workflow engine.
//!
//! This crate provides the cross-entity workflow core of a personal
//! task-management backend: AI-suggested-task generation and acceptance,
//! deadline-driven reminder scheduling with a windowed dispatch sweep, and
//! a token-based task-sharing invite protocol. Transport, authentication,
//! and message delivery are external collaborators reached through ports.
//!
//! # Architecture
//!
//! Taskloom follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//! - **Services**: Orchestration over domain and ports
//!
//! # Modules
//!
//! - [`task`]: Canonical task store and owner-scoped task lifecycle
//! - [`suggestion`]: Generator-backed suggestion engine, parser, and quota
//! - [`reminder`]: Reminder scheduling and the periodic dispatch sweep
//! - [`invite`]: Task-sharing invites with single-use opaque tokens
//! - [`notify`]: Outbound notification port and mail templates
//! - [`user`]: Minimal user lookup collaborator

pub mod invite;
pub mod notify;
pub mod reminder;
pub mod suggestion;
pub mod task;
pub mod user;
