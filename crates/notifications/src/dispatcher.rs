use std::collections::HashMap;
use std::sync::Arc;

use orderflow_parties::{CustomerDirectory, CustomerTier};
use orderflow_sales::{Order, TransitionNotifier};

use crate::strategy::{
    Channel, NotificationOutcome, NotificationStrategy, RegularNotification, WebhookNotification,
};
use crate::webhook::{WebhookClient, WebhookConfig};

/// Picks one strategy per order by the owner's tier and runs it.
///
/// Owners that cannot be found, untagged owners and unknown tags all go to
/// the regular strategy.
pub struct NotificationDispatcher {
    customers: Arc<dyn CustomerDirectory>,
    strategies: HashMap<CustomerTier, Box<dyn NotificationStrategy>>,
    fallback: RegularNotification,
}

impl core::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut tiers: Vec<_> = self.strategies.keys().map(CustomerTier::as_str).collect();
        tiers.sort_unstable();
        f.debug_struct("NotificationDispatcher")
            .field("tiers", &tiers)
            .finish_non_exhaustive()
    }
}

impl NotificationDispatcher {
    /// Dispatcher with no tier-specific strategies; everything is regular.
    pub fn new(customers: Arc<dyn CustomerDirectory>) -> Self {
        Self {
            customers,
            strategies: HashMap::new(),
            fallback: RegularNotification,
        }
    }

    /// The standard tier map: regular is logged, premium gets email,
    /// vip gets WhatsApp, both through `client` to `config.url`.
    pub fn standard(
        customers: Arc<dyn CustomerDirectory>,
        client: Arc<dyn WebhookClient>,
        config: &WebhookConfig,
    ) -> Self {
        Self::new(customers)
            .with_strategy(CustomerTier::Regular, RegularNotification)
            .with_strategy(
                CustomerTier::Premium,
                WebhookNotification::new(Channel::Email, config.url.clone(), client.clone()),
            )
            .with_strategy(
                CustomerTier::Vip,
                WebhookNotification::new(Channel::Whatsapp, config.url.clone(), client),
            )
    }

    pub fn with_strategy(
        mut self,
        tier: CustomerTier,
        strategy: impl NotificationStrategy + 'static,
    ) -> Self {
        self.strategies.insert(tier, Box::new(strategy));
        self
    }

    pub fn dispatch(&self, order: &Order) -> NotificationOutcome {
        let customer = self.customers.find(order.customer_id());
        let tier = customer.as_ref().map(|c| c.tier()).unwrap_or_default();

        tracing::debug!(
            order_id = %order.id_typed(),
            user_id = %order.customer_id(),
            tier = %tier,
            customer_found = customer.is_some(),
            "dispatching order notification"
        );

        match self.strategies.get(&tier) {
            Some(strategy) => strategy.notify(order, customer.as_ref()),
            None => self.fallback.notify(order, customer.as_ref()),
        }
    }
}

impl TransitionNotifier for NotificationDispatcher {
    fn order_transitioned(&self, order: &Order) {
        // Outcome is already logged by the strategy.
        let _ = self.dispatch(order);
    }
}
