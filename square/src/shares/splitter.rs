use super::{append_to_shares, namespaced_padded_shares, Config, Message, NamespacedShare};
use tracing::trace;

/// Lazily splits messages into the shares that will eventually populate a data square.
///
/// Messages are kept as groups of shares (one group per write) until [Self::export] sorts the
/// groups by namespace and flattens them. The sort is stable, so groups that share a namespace
/// (notably a message and the padding written after it) keep their write order.
///
/// # Warning
///
/// Not safe for concurrent use.
pub struct MessageShareSplitter {
    cfg: Config,
    shares: Vec<Vec<NamespacedShare>>,
    count: usize,
}

impl Default for MessageShareSplitter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl MessageShareSplitter {
    /// Create a new, empty [MessageShareSplitter].
    ///
    /// # Panics
    ///
    /// Panics if `cfg.share_size` does not leave room for a payload after the namespace.
    pub fn new(cfg: Config) -> Self {
        cfg.assert_valid();
        Self {
            cfg,
            shares: Vec::new(),
            count: 0,
        }
    }

    /// Split the delimited encoding of `msg` into shares and add them as a new group.
    ///
    /// # Panics
    ///
    /// Panics if `msg` cannot be encoded. Messages reaching the splitter have already been
    /// accepted upstream, so this indicates a broken invariant rather than bad input.
    pub fn write(&mut self, msg: &Message) {
        let raw = match msg.encode_delimited() {
            Ok(raw) => raw,
            Err(err) => panic!(
                "accepted a message that can not be encoded (namespace={}): {err}",
                msg.namespace
            ),
        };
        let shares = append_to_shares(&self.cfg, Vec::new(), msg.namespace, &raw);
        trace!(
            namespace = %msg.namespace,
            len = raw.len(),
            shares = shares.len(),
            "wrote message"
        );
        self.count += shares.len();
        self.shares.push(shares);
    }

    /// Add `count` empty shares in the namespace of the last written group.
    ///
    /// This is used to follow the message layout rules (aligning the next message to a subtree
    /// boundary).
    ///
    /// # Panics
    ///
    /// Panics if nothing has been written yet.
    pub fn write_namespaced_padded_shares(&mut self, count: usize) {
        let Some(last) = self.shares.last() else {
            panic!("cannot write namespaced padded shares on an empty splitter");
        };
        if count == 0 {
            return;
        }
        let id = last[0].id;
        trace!(namespace = %id, count, "wrote padding");
        self.shares.push(namespaced_padded_shares(&self.cfg, id, count));
        self.count += count;
    }

    /// Returns the number of shares that [Self::export] will produce.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the layout configuration of the splitter.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Sort all written groups by namespace and return their shares as one contiguous list.
    pub fn export(mut self) -> Vec<NamespacedShare> {
        // `sort_by_key` is stable
        self.shares.sort_by_key(|group| group[0].id);
        let mut shares = Vec::with_capacity(self.count);
        for group in self.shares {
            shares.extend(group);
        }
        shares
    }
}
