use std::sync::Arc;

use serde_json::Value;

use crate::{
    cart::{CartItem, CartState, CartStore},
    client::{DraftApi, SubmissionApi},
    drafts::{DraftConfig, DraftFlow, DraftSessionManager, DraftSnapshot, LoadOutcome},
    dto::{
        auxiliary::AuxiliaryForm,
        orders::{NewOrder, OrderConfirmation, OrderLine},
    },
    storage::KeyValueStore,
};

use super::{FlowError, ReviewForm, ReviewStage};

pub const CHECKOUT_REQUIRED_FIELDS: &[&str] = &["name", "phone", "address"];

/// Order checkout: customer form plus the cart, autosaved together.
#[derive(Debug)]
pub struct CheckoutFlow<A, P, S> {
    form: ReviewForm<A, S>,
    submissions: Arc<P>,
    cart: Vec<CartItem>,
}

impl<A, P, S> CheckoutFlow<A, P, S>
where
    A: DraftApi + 'static,
    P: SubmissionApi,
    S: KeyValueStore,
{
    pub fn new(drafts: Arc<A>, submissions: Arc<P>, session_storage: S, config: DraftConfig) -> Self {
        let drafts = DraftSessionManager::new(DraftFlow::Checkout, drafts, session_storage, config);
        Self {
            form: ReviewForm::new(drafts, CHECKOUT_REQUIRED_FIELDS),
            submissions,
            cart: Vec::new(),
        }
    }

    pub fn form(&self) -> &ReviewForm<A, S> {
        &self.form
    }

    pub fn stage(&self) -> ReviewStage {
        self.form.stage()
    }

    /// Loads a saved draft into the form. The cart itself comes from the
    /// local cart store; the draft's cart copy is only returned for display.
    pub async fn mount(&mut self, cart: &CartState) -> LoadOutcome {
        self.cart = cart.items.clone();
        self.form.mount().await
    }

    pub fn set_field(&mut self, field: &str, value: impl Into<Value>) {
        self.form.set_field(field, value.into());
        self.autosave();
    }

    /// Call after every cart mutation so the draft carries the current items.
    pub fn sync_cart(&mut self, cart: &CartState) {
        if self.cart == cart.items {
            return;
        }
        self.cart = cart.items.clone();
        self.autosave();
    }

    pub fn attach_auxiliary(&mut self, form: AuxiliaryForm) {
        self.form.attach_auxiliary(form);
    }

    pub fn review(&mut self, cart: &CartState) -> Result<(), FlowError> {
        self.cart = cart.items.clone();
        self.form.review(Vec::new())?;
        if cart.is_empty() {
            self.form.edit();
            return Err(FlowError::EmptyCart);
        }
        Ok(())
    }

    pub fn edit(&mut self) {
        self.form.edit();
    }

    pub fn cancel(&mut self) {
        self.form.cancel();
        self.cart.clear();
    }

    /// Places the order for the reviewed cart. On success the draft is
    /// deleted and the cart cleared; on failure both are left untouched.
    pub async fn confirm<C: KeyValueStore>(
        &mut self,
        cart: &mut CartStore<C>,
    ) -> Result<OrderConfirmation, FlowError> {
        self.form.ensure_reviewing()?;
        if !cart.has_items() {
            self.form.edit();
            return Err(FlowError::EmptyCart);
        }
        self.form.drafts.begin_submit();
        self.form.submit_auxiliary(&*self.submissions).await;

        let order = NewOrder {
            session_id: self.form.drafts.session_id().cloned(),
            customer: self.form.values().clone(),
            items: cart.items().iter().map(OrderLine::from).collect(),
            expected_total: cart.total(),
        };

        match self.submissions.create_order(&order).await {
            Ok(confirmation) => {
                tracing::info!(
                    invoice_number = %confirmation.invoice_number,
                    total = %confirmation.total_amount,
                    "order confirmed"
                );
                self.form.committed().await;
                cart.clear();
                self.cart.clear();
                Ok(confirmation)
            }
            Err(err) => Err(self.form.submission_failed(err)),
        }
    }

    fn autosave(&mut self) {
        let snapshot = DraftSnapshot::with_cart(self.form.values().clone(), self.cart.clone());
        self.form.drafts.record_change(snapshot);
    }
}
