//! Path resolvers.

use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::QueryContext;
use shared_types::{Cid, ContentPath};
use tracing::trace;

use crate::domain::ResolveError;
use crate::ports::{DagService, PathResolver};

/// Resolves bare roots only; any link segment is unresolvable.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectPathResolver;

#[async_trait]
impl PathResolver for DirectPathResolver {
    async fn resolve_path(&self, _ctx: &QueryContext, path: &ContentPath) -> Result<Cid, ResolveError> {
        match path.segments().first() {
            None => Ok(*path.root()),
            Some(name) => Err(ResolveError::NoLink {
                name: name.clone(),
                parent: *path.root(),
            }),
        }
    }
}

/// Resolves link segments by walking named links through a [`DagService`].
pub struct DagPathResolver {
    dag: Arc<dyn DagService>,
}

impl DagPathResolver {
    /// Resolver reading nodes from `dag`.
    pub fn new(dag: Arc<dyn DagService>) -> Self {
        Self { dag }
    }
}

#[async_trait]
impl PathResolver for DagPathResolver {
    async fn resolve_path(&self, ctx: &QueryContext, path: &ContentPath) -> Result<Cid, ResolveError> {
        let mut current = *path.root();
        for name in path.segments() {
            let links = self.dag.get_links(ctx, &current).await?;
            let next = links
                .into_iter()
                .find(|link| &link.name == name)
                .ok_or_else(|| ResolveError::NoLink {
                    name: name.clone(),
                    parent: current,
                })?;
            trace!(parent = %current, link = %name, child = %next.cid, "Path segment resolved");
            current = next.cid;
        }
        Ok(current)
    }
}
