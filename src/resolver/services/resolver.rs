//! Tiered capability access.

use super::CallerContext;
use crate::capability::services::CapabilityRegistry;
use crate::config::ResolverConfig;
use crate::curator::Curator;
use crate::resolver::domain::{
    AccessTier, AttemptOutcome, InvocationReport, InvokeError, TierAttempt, TierTrail,
};
use crate::resolver::ports::{GatewayResolver, HandlerDirectory, HandlerError, SharedHandler};
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

/// How a single tier attempt ended, before it is folded into the report.
enum TierResult {
    NotResolved,
    Returned(Result<Value, HandlerError>),
    TimedOut,
    Cancelled,
}

/// Invokes named capabilities through the caller's fallback chain.
///
/// Orchestrators try a direct enabling-service reference, then the
/// registered `soa_api` handler, then the access gateway. Enabling services
/// skip the first tier. A tier that cannot be resolved, reports its
/// dependency unavailable or times out hands over to the next one; a
/// business error from a resolved tier ends the chain.
pub struct TieredAccessResolver<D, G, C = DefaultClock>
where
    D: HandlerDirectory + ?Sized,
    G: GatewayResolver + ?Sized,
    C: Clock + Send + Sync,
{
    capabilities: CapabilityRegistry<C>,
    directory: Arc<D>,
    gateway: Arc<G>,
    config: ResolverConfig,
}

impl<D, G, C> Clone for TieredAccessResolver<D, G, C>
where
    D: HandlerDirectory + ?Sized,
    G: GatewayResolver + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            capabilities: self.capabilities.clone(),
            directory: Arc::clone(&self.directory),
            gateway: Arc::clone(&self.gateway),
            config: self.config,
        }
    }
}

impl<D, G, C> fmt::Debug for TieredAccessResolver<D, G, C>
where
    D: HandlerDirectory + ?Sized,
    G: GatewayResolver + ?Sized,
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TieredAccessResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<D, G, C> TieredAccessResolver<D, G, C>
where
    D: HandlerDirectory + ?Sized,
    G: GatewayResolver + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a resolver over `capabilities`.
    #[must_use]
    pub const fn new(
        capabilities: CapabilityRegistry<C>,
        directory: Arc<D>,
        gateway: Arc<G>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            capabilities,
            directory,
            gateway,
            config,
        }
    }

    /// Creates a resolver reading capabilities through `curator`.
    #[must_use]
    pub fn from_curator(
        curator: &Curator<C>,
        directory: Arc<D>,
        gateway: Arc<G>,
        config: ResolverConfig,
    ) -> Self {
        Self::new(curator.capabilities().clone(), directory, gateway, config)
    }

    /// Returns the resolver configuration.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Invokes `capability` with `args` on behalf of `ctx`.
    ///
    /// Always yields a report: either a tier's result, a business error
    /// from a resolved tier, a cancellation, or a
    /// [`InvokeError::CapabilityUnavailable`] listing every tier tried.
    pub async fn invoke(
        &self,
        capability: &str,
        args: Value,
        ctx: &CallerContext,
    ) -> InvocationReport {
        let invocation_id = Uuid::new_v4();
        let name = capability.trim();
        let span = info_span!(
            "invoke",
            capability = %name,
            role = %ctx.role(),
            invocation_id = %invocation_id
        );
        self.walk_chain(invocation_id, name, &args, ctx)
            .instrument(span)
            .await
    }

    async fn walk_chain(
        &self,
        invocation_id: Uuid,
        capability: &str,
        args: &Value,
        ctx: &CallerContext,
    ) -> InvocationReport {
        let chain = ctx.role().chain(self.config.enabling_service_tier);
        let timeout = ctx
            .tier_timeout()
            .unwrap_or_else(|| self.config.tier_timeout());
        let mut attempts = Vec::with_capacity(chain.len());
        let report = |tried: Vec<TierAttempt>, result: Result<Value, InvokeError>| {
            InvocationReport::new(invocation_id, capability.to_owned(), tried, result)
        };

        for (index, tier) in chain.into_iter().enumerate() {
            let position = index.saturating_add(1);
            if ctx.cancellation().is_cancelled() {
                info!(%tier, "invocation cancelled before tier");
                return report(attempts, Err(cancelled(capability)));
            }

            let result = self.attempt_tier(tier, capability, args, ctx, timeout).await;
            let (outcome, terminal) = classify(tier, position, capability, timeout, result);
            attempts.push(TierAttempt::new(position, tier, outcome));
            if let Some(finished) = terminal {
                return report(attempts, finished);
            }
        }

        let trail: TierTrail = attempts.iter().map(TierAttempt::tier).collect();
        let failure = InvokeError::CapabilityUnavailable {
            capability: capability.to_owned(),
            trail,
        };
        warn!(error = %failure, "every tier exhausted");
        report(attempts, Err(failure))
    }

    async fn attempt_tier(
        &self,
        tier: AccessTier,
        capability: &str,
        args: &Value,
        ctx: &CallerContext,
        timeout: Duration,
    ) -> TierResult {
        let call = async {
            match self.resolve_tier(tier, capability, ctx).await {
                Some(handler) => TierResult::Returned(handler.call(args.clone()).await),
                None => TierResult::NotResolved,
            }
        };

        tokio::select! {
            biased;
            () = ctx.cancellation().cancelled() => TierResult::Cancelled,
            finished = tokio::time::timeout(timeout, call) => {
                finished.unwrap_or(TierResult::TimedOut)
            }
        }
    }

    async fn resolve_tier(
        &self,
        tier: AccessTier,
        capability: &str,
        ctx: &CallerContext,
    ) -> Option<SharedHandler> {
        match tier {
            AccessTier::EnablingService => ctx.enabling_service_for(capability),
            AccessTier::SoaApi => self.resolve_soa_handler(capability, ctx).await,
            AccessTier::Gateway => self.gateway.resolve(ctx.realm(), capability).await,
        }
    }

    async fn resolve_soa_handler(
        &self,
        capability: &str,
        ctx: &CallerContext,
    ) -> Option<SharedHandler> {
        let candidates = self.capabilities.find_invocable(capability, ctx.realm());
        for record in &candidates {
            let Some(contract) = record.contracts().soa_api() else {
                continue;
            };
            if let Some(handler) = self.directory.resolve(contract.handler()).await {
                return Some(handler);
            }
            debug!(
                service = %record.service_name(),
                handler = %contract.handler(),
                "soa_api handler not in directory"
            );
        }
        None
    }
}

/// Maps a tier result to its recorded outcome and, when the chain stops
/// here, the invocation's final result.
fn classify(
    tier: AccessTier,
    position: usize,
    capability: &str,
    timeout: Duration,
    result: TierResult,
) -> (AttemptOutcome, Option<Result<Value, InvokeError>>) {
    match result {
        TierResult::NotResolved => {
            debug!(%tier, position, "tier not resolvable");
            (AttemptOutcome::NotResolved, None)
        }
        TierResult::TimedOut => {
            warn!(%tier, position, ?timeout, "tier timed out, falling back");
            (AttemptOutcome::TimedOut, None)
        }
        TierResult::Cancelled => {
            info!(%tier, position, "invocation cancelled during tier");
            (AttemptOutcome::Cancelled, Some(Err(cancelled(capability))))
        }
        TierResult::Returned(Ok(value)) => {
            info!(%tier, position, "capability invoked");
            (AttemptOutcome::Succeeded, Some(Ok(value)))
        }
        TierResult::Returned(Err(HandlerError::DependencyUnavailable(reason))) => {
            warn!(%tier, position, %reason, "tier dependency unavailable, falling back");
            (AttemptOutcome::Unavailable(reason), None)
        }
        TierResult::Returned(Err(HandlerError::Business { code, message })) => {
            info!(%tier, position, %code, "capability reported business failure");
            (
                AttemptOutcome::BusinessFailure(code.clone()),
                Some(Err(InvokeError::Business { code, message })),
            )
        }
    }
}

fn cancelled(capability: &str) -> InvokeError {
    InvokeError::Cancelled {
        capability: capability.to_owned(),
    }
}
