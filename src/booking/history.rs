use crate::{api::PaymentAPI, entities::PaymentIntentRecord, error::Error};

const PAGE_SIZE: usize = 4;

/// Payment history fetched once in full and revealed a page at a time.
#[derive(Clone, Debug)]
pub struct HistoryView {
    records: Vec<PaymentIntentRecord>,
    visible: usize,
}

impl HistoryView {
    pub fn new(records: Vec<PaymentIntentRecord>) -> Self {
        Self {
            records,
            visible: PAGE_SIZE,
        }
    }

    pub async fn fetch<A>(api: &A) -> Result<Self, Error>
    where
        A: PaymentAPI + Sync + ?Sized,
    {
        Ok(Self::new(api.list_payment_history().await?))
    }

    pub fn visible(&self) -> &[PaymentIntentRecord] {
        &self.records[..self.visible.min(self.records.len())]
    }

    pub fn has_more(&self) -> bool {
        self.records.len() > self.visible
    }

    pub fn show_more(&mut self) {
        if self.has_more() {
            self.visible += PAGE_SIZE;
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
