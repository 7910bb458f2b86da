/// Workspace-wide result type. Typed errors convert into it at crate edges.
pub type Result<T> = anyhow::Result<T>;
