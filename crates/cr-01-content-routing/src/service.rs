//! # Content Routing Service
//!
//! Implements [`DhtApi`] over the configured routing backend.

use std::sync::Arc;

use async_trait::async_trait;
use cr_02_block_service::Blockstore;
use cr_telemetry::{log_cid_event, time_histogram, PROVIDES_ANNOUNCED, PROVIDE_DURATION, PROVIDE_FAILURES};
use shared_bus::{QueryContext, QueryEventRegistry};
use shared_types::{Cid, ContentPath, Multiaddr, PeerId};
use tracing::{debug, info, warn};

use crate::bridge::{self, ResultStream};
use crate::config::ContentRoutingConfig;
use crate::domain::{
    enumerate_children_async, CidSet, ContentRoutingError, FindProvidersOptions, ProvideOptions,
    ProvidePhase,
};
use crate::ports::{DagService, DhtApi, DhtRouting, PathResolver, PeerHost, RoutingBackend};

/// The content routing service.
///
/// `routing` is `None` when the node runs offline; lookups then fail with
/// `NotDht` and announcements with `Offline`.
pub struct ContentRoutingService {
    config: ContentRoutingConfig,
    routing: Option<RoutingBackend>,
    host: Arc<dyn PeerHost>,
    resolver: Arc<dyn PathResolver>,
    dag: Arc<dyn DagService>,
    blockstore: Arc<dyn Blockstore>,
    registry: Arc<QueryEventRegistry>,
}

impl ContentRoutingService {
    /// Create an offline service. Attach routing with [`Self::with_routing`].
    pub fn new(
        config: ContentRoutingConfig,
        host: Arc<dyn PeerHost>,
        resolver: Arc<dyn PathResolver>,
        dag: Arc<dyn DagService>,
        blockstore: Arc<dyn Blockstore>,
    ) -> Self {
        let registry = Arc::new(QueryEventRegistry::with_capacity(config.event_channel_capacity));
        Self {
            config,
            routing: None,
            host,
            resolver,
            dag,
            blockstore,
            registry,
        }
    }

    /// Use `routing` for lookups and announcements.
    #[must_use]
    pub fn with_routing(mut self, routing: RoutingBackend) -> Self {
        self.routing = Some(routing);
        self
    }

    /// Share `registry` with routing backends that publish progress events.
    #[must_use]
    pub fn with_event_registry(mut self, registry: Arc<QueryEventRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// The registry lookups register their operations with.
    #[must_use]
    pub fn event_registry(&self) -> Arc<QueryEventRegistry> {
        Arc::clone(&self.registry)
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ContentRoutingConfig {
        &self.config
    }

    /// Whether a routing backend is configured.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.routing.is_some()
    }

    /// Provider request defaults taken from the configuration.
    #[must_use]
    pub fn default_find_providers_options(&self) -> FindProvidersOptions {
        FindProvidersOptions::default().num_providers(self.config.default_num_providers)
    }

    fn dht(&self) -> Result<Arc<dyn DhtRouting>, ContentRoutingError> {
        self.routing
            .as_ref()
            .and_then(RoutingBackend::as_dht)
            .cloned()
            .ok_or(ContentRoutingError::NotDht)
    }

    /// Announce `cids` once each, in order.
    ///
    /// Stops at the first failed announcement; earlier ones are not undone.
    pub async fn provide_keys(
        &self,
        ctx: &QueryContext,
        cids: &[Cid],
    ) -> Result<usize, ContentRoutingError> {
        let routing = self.routing.as_ref().ok_or(ContentRoutingError::Offline)?;
        for cid in cids {
            announce(ctx, routing, cid).await?;
        }
        Ok(cids.len())
    }

    /// Announce every identifier reachable from each of `roots`, roots
    /// included. An identifier reachable from several roots, or by several
    /// paths, is announced once.
    ///
    /// Returns the number of distinct identifiers announced.
    pub async fn provide_keys_recursive(
        &self,
        ctx: &QueryContext,
        roots: &[Cid],
    ) -> Result<usize, ContentRoutingError> {
        let routing = self.routing.as_ref().ok_or(ContentRoutingError::Offline)?;
        let mut announced = CidSet::new();

        for root in roots {
            let reachable = self.reachable_from(ctx, *root).await?;
            announce_new(ctx, routing, &reachable, &mut announced).await?;
        }
        Ok(announced.len())
    }

    async fn reachable_from(&self, ctx: &QueryContext, root: Cid) -> Result<CidSet, ContentRoutingError> {
        let mut reachable = CidSet::new();
        enumerate_children_async(
            ctx,
            &self.dag,
            root,
            &mut reachable,
            self.config.traversal_concurrency,
        )
        .await?;
        debug!(root = %root, reachable = reachable.len(), "Subgraph enumerated");
        Ok(reachable)
    }

    async fn check_provide_preconditions(
        &self,
        ctx: &QueryContext,
        path: &ContentPath,
    ) -> Result<(&RoutingBackend, Cid), ContentRoutingError> {
        let routing = self.routing.as_ref().ok_or(ContentRoutingError::Offline)?;
        if self.host.connected_peers() == 0 {
            return Err(ContentRoutingError::NoConnectedPeers);
        }
        let cid = self.resolver.resolve_path(ctx, path).await?;
        if !self.blockstore.has(&cid).await? {
            return Err(ContentRoutingError::BlockNotLocal(cid));
        }
        Ok((routing, cid))
    }

    async fn run_provide(
        &self,
        ctx: &QueryContext,
        path: &ContentPath,
        options: ProvideOptions,
        phase: &mut ProvidePhase,
    ) -> Result<usize, ContentRoutingError> {
        let (routing, cid) = self.check_provide_preconditions(ctx, path).await?;

        if options.recursive {
            advance(phase, ProvidePhase::Traversing, &cid);
            let reachable = self.reachable_from(ctx, cid).await?;

            advance(phase, ProvidePhase::Announcing, &cid);
            let mut announced = CidSet::new();
            announce_new(ctx, routing, &reachable, &mut announced).await?;
            Ok(announced.len())
        } else {
            advance(phase, ProvidePhase::Announcing, &cid);
            announce(ctx, routing, &cid).await?;
            Ok(1)
        }
    }
}

fn advance(phase: &mut ProvidePhase, next: ProvidePhase, cid: &Cid) {
    debug_assert!(phase.can_advance_to(next), "{phase} -> {next}");
    log_cid_event!(debug, "provide", "Provide phase", cid, from = %phase, to = %next);
    *phase = next;
}

/// Announce each member of `reachable` not yet in `announced`, adding it to
/// `announced` once its announcement succeeds.
async fn announce_new(
    ctx: &QueryContext,
    routing: &RoutingBackend,
    reachable: &CidSet,
    announced: &mut CidSet,
) -> Result<(), ContentRoutingError> {
    for cid in reachable.iter() {
        if announced.has(cid) {
            continue;
        }
        announce(ctx, routing, cid).await?;
        announced.add(*cid);
    }
    Ok(())
}

async fn announce(
    ctx: &QueryContext,
    routing: &RoutingBackend,
    cid: &Cid,
) -> Result<(), ContentRoutingError> {
    if ctx.is_cancelled() {
        return Err(ContentRoutingError::Cancelled);
    }
    routing.provide(ctx, cid, true).await?;
    PROVIDES_ANNOUNCED.inc();
    log_cid_event!(debug, "provide", "Provider record announced", cid, backend = routing.kind());
    Ok(())
}

#[async_trait]
impl DhtApi for ContentRoutingService {
    async fn find_peer(
        &self,
        ctx: &QueryContext,
        peer: PeerId,
    ) -> Result<ResultStream<Multiaddr>, ContentRoutingError> {
        let dht = self.dht()?;
        Ok(bridge::spawn_find_peer(
            &self.registry,
            ctx,
            dht,
            peer,
            self.config.output_channel_capacity,
        ))
    }

    async fn find_providers(
        &self,
        ctx: &QueryContext,
        path: &ContentPath,
        options: Option<FindProvidersOptions>,
    ) -> Result<ResultStream<PeerId>, ContentRoutingError> {
        let dht = self.dht()?;
        let options = options.unwrap_or_else(|| self.default_find_providers_options());
        if options.num_providers < 1 {
            return Err(ContentRoutingError::InvalidArgument(
                "number of providers must be greater than 0".into(),
            ));
        }
        let cid = self.resolver.resolve_path(ctx, path).await?;

        Ok(bridge::spawn_find_providers(
            &self.registry,
            ctx,
            dht,
            cid,
            options.num_providers,
            self.config.output_channel_capacity,
        ))
    }

    async fn provide(
        &self,
        ctx: &QueryContext,
        path: &ContentPath,
        options: ProvideOptions,
    ) -> Result<(), ContentRoutingError> {
        let _timer = time_histogram!(PROVIDE_DURATION);
        info!(operation = "provide", path = %path, recursive = options.recursive, "Provide started");

        let mut phase = ProvidePhase::Validating;
        match self.run_provide(ctx, path, options, &mut phase).await {
            Ok(count) => {
                advance(&mut phase, ProvidePhase::Done, path.root());
                info!(operation = "provide", path = %path, announced = count, "Provide finished");
                Ok(())
            }
            Err(e) => {
                PROVIDE_FAILURES.with_label_values(&[e.reason()]).inc();
                if e.is_precondition() {
                    info!(operation = "provide", path = %path, error = %e, "Provide refused");
                } else {
                    warn!(operation = "provide", path = %path, phase = %phase, error = %e, "Provide failed");
                }
                advance(&mut phase, ProvidePhase::Failed, path.root());
                Err(e)
            }
        }
    }
}
