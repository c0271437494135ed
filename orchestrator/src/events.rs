use explorer_vndb::Record;
use tokio::sync::mpsc;

/// Progress notifications for the UI layer, delivered in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationEvent {
    /// A human-readable activity line for the in-progress model turn
    Activity(String),
    /// Newly fetched, error-free records
    DataRetrieved(Vec<Record>),
}

/// Fire-and-forget sender for conversation events. A dropped receiver just
/// means nobody is listening.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<ConversationEvent>>,
}

impl EventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ConversationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that discards everything
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn activity(&self, line: &str) {
        self.emit(ConversationEvent::Activity(line.to_string()));
    }

    pub fn data_retrieved(&self, records: Vec<Record>) {
        self.emit(ConversationEvent::DataRetrieved(records));
    }

    fn emit(&self, event: ConversationEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
