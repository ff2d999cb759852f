use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use crossbeam_channel::{unbounded, Receiver, Sender};
use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::{BusConfig, Delivery};
use crate::message::{ChannelName, Message, Payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&Payload) + Send + Sync + 'static>;

/// Subscribers per channel, in subscription order.
type Channels = HashMap<ChannelName, IndexMap<SubscriptionId, Listener>>;

/// A queued message and the subscribers of its channel at the time it was published.
struct Pending {
    message: Message,
    recipients: Vec<SubscriptionId>,
}

struct Shared {
    config: BusConfig,
    channels: Mutex<Channels>,
    next_subscription_id: AtomicU64,
    queue_sender: Sender<Pending>,
    queue_receiver: Receiver<Pending>,
}

/// A named publish/subscribe bus.
///
/// Clones refer to the same bus. Separately constructed buses are fully isolated from each other.
#[derive(Clone)]
pub struct Bus {
    shared: Arc<Shared>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        let (queue_sender, queue_receiver) = unbounded::<Pending>();

        Self {
            shared: Arc::new(Shared {
                config,
                channels: Mutex::new(HashMap::new()),
                next_subscription_id: AtomicU64::new(0),
                queue_sender,
                queue_receiver,
            }),
        }
    }

    /// A lazily created, process-wide bus with the default config.
    pub fn global() -> Bus {
        static GLOBAL: OnceLock<Bus> = OnceLock::new();

        GLOBAL.get_or_init(Bus::new).clone()
    }

    pub fn config(&self) -> &BusConfig {
        &self.shared.config
    }

    /// `true` if both refer to the same bus.
    pub fn ptr_eq(&self, other: &Bus) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Adds a listener to the channel.
    ///
    /// The listener stays subscribed until the returned [`Subscription`] is dropped or
    /// unsubscribed.
    pub fn subscribe<F>(&self, channel: &ChannelName, listener: F) -> Subscription
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        let id = SubscriptionId(
            self.shared
                .next_subscription_id
                .fetch_add(1, Ordering::Relaxed),
        );

        let listener: Listener = Arc::new(listener);
        let subscriber_count = {
            let mut channels = self.shared.channels.lock();
            let listeners = channels
                .entry(channel.clone())
                .or_default();
            listeners.insert(id, listener);
            listeners.len()
        };
        debug!(
            "Subscribed. channel: '{}', id: {:?}, subscribers: {}",
            channel, id, subscriber_count
        );

        Subscription {
            bus: Arc::downgrade(&self.shared),
            channel: channel.clone(),
            id,
            active: true,
        }
    }

    /// Publishes a payload to every subscriber of the channel.
    ///
    /// With [`Delivery::Immediate`] the listeners have all been invoked when this returns, with
    /// [`Delivery::Queued`] nothing is delivered until [`Bus::dispatch_pending`] is called.
    ///
    /// Only the subscribers at the time of publishing receive the message, and only if they are
    /// still subscribed when it is delivered. Publishing on a channel without subscribers does
    /// nothing.
    pub fn publish(&self, channel: &ChannelName, payload: Payload) {
        let recipients = self.subscriber_ids(channel);
        if recipients.is_empty() {
            trace!("No subscribers, message dropped. channel: '{}'", channel);
            return;
        }

        let message = Message {
            channel: channel.clone(),
            payload,
        };

        match self.shared.config.delivery {
            Delivery::Immediate => {
                self.deliver(&message, &recipients);
            }
            Delivery::Queued => {
                trace!(
                    "Queueing message. channel: '{}', recipients: {}",
                    message.channel,
                    recipients.len()
                );
                // the receiver is owned by the same `Shared`, so the queue can't be disconnected.
                let _ = self
                    .shared
                    .queue_sender
                    .send(Pending {
                        message,
                        recipients,
                    });
            }
        }
    }

    /// Delivers queued messages in publish order, including any published while dispatching.
    ///
    /// Returns the number of messages dispatched.
    pub fn dispatch_pending(&self) -> usize {
        let mut dispatched = 0;
        while let Ok(pending) = self.shared.queue_receiver.try_recv() {
            self.deliver(&pending.message, &pending.recipients);
            dispatched += 1;
        }

        if dispatched > 0 {
            trace!("Dispatched pending messages. count: {}", dispatched);
        }

        dispatched
    }

    pub fn pending_count(&self) -> usize {
        self.shared.queue_receiver.len()
    }

    pub fn subscriber_count(&self, channel: &ChannelName) -> usize {
        self.shared
            .channels
            .lock()
            .get(channel)
            .map_or(0, |listeners| listeners.len())
    }

    /// The number of channels that currently have at least one subscriber.
    pub fn channel_count(&self) -> usize {
        self.shared.channels.lock().len()
    }

    /// Invokes each recipient that is still subscribed, one at a time, in subscription order. No
    /// lock is held while a listener runs.
    fn deliver(&self, message: &Message, recipients: &[SubscriptionId]) -> usize {
        let mut delivered = 0;
        for id in recipients {
            // an earlier listener, or anything since the message was queued, may have unsubscribed it.
            let Some(listener) = self.listener(&message.channel, *id) else {
                trace!("Skipping unsubscribed listener. channel: '{}', id: {:?}", message.channel, id);
                continue;
            };

            listener(&message.payload);
            delivered += 1;
        }
        trace!("Delivered message. channel: '{}', listeners: {}", message.channel, delivered);

        delivered
    }

    fn subscriber_ids(&self, channel: &ChannelName) -> Vec<SubscriptionId> {
        self.shared
            .channels
            .lock()
            .get(channel)
            .map(|listeners| listeners.keys().copied().collect())
            .unwrap_or_default()
    }

    fn listener(&self, channel: &ChannelName, id: SubscriptionId) -> Option<Listener> {
        self.shared
            .channels
            .lock()
            .get(channel)
            .and_then(|listeners| listeners.get(&id))
            .cloned()
    }
}

impl Debug for Bus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("config", &self.shared.config)
            .field("channels", &self.channel_count())
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// Keeps a listener subscribed, removing it when dropped.
#[must_use = "dropping a subscription unsubscribes the listener"]
pub struct Subscription {
    bus: Weak<Shared>,
    channel: ChannelName,
    id: SubscriptionId,
    active: bool,
}

impl Subscription {
    pub fn channel(&self) -> &ChannelName {
        &self.channel
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        let Some(shared) = self.bus.upgrade() else {
            return;
        };

        let removed = {
            let mut channels = shared.channels.lock();
            match channels.get_mut(&self.channel) {
                Some(listeners) => {
                    // `shift_remove` keeps the remaining subscribers in subscription order.
                    let removed = listeners.shift_remove(&self.id);
                    if listeners.is_empty() {
                        channels.remove(&self.channel);
                    }
                    removed
                }
                None => None,
            }
        };

        // the listener may own values whose drop needs the channel lock, drop it after unlocking.
        if removed.is_some() {
            debug!("Unsubscribed. channel: '{}', id: {:?}", self.channel, self.id);
        }
        drop(removed);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
