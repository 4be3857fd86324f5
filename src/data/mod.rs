/// Data layer: core types, loading, and the current session.
///
/// Architecture:
/// ```text
///   results.json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate → Dataset | LoadError
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  session  │  Empty | Loaded(Dataset), swapped only on success
///   └──────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod session;
