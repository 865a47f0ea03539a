//! Storefront order form state

use rust_decimal::Decimal;
use shared::client::ProductView;
use shared::order::validation::{MAX_QUANTITY, MIN_QUANTITY};
use shared::order::{FieldErrors, OrderSubmission, format_amount};
use shared::{Order, Product};

use crate::api::StorefrontApi;
use crate::{ClientError, ClientResult};

/// Form fields plus the inline error map
///
/// The quantity is always within `1..=999`; every setter clamps.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderForm {
    product_id: String,
    unit_price: Decimal,
    quantity: u32,
    pub name: String,
    pub phone: String,
    pub address: String,
    errors: FieldErrors,
}

impl OrderForm {
    pub fn new(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            unit_price: product.unit_price(),
            quantity: MIN_QUANTITY,
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            errors: FieldErrors::new(),
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn increment(&mut self) {
        self.set_quantity(self.quantity.saturating_add(1));
    }

    pub fn decrement(&mut self) {
        self.set_quantity(self.quantity.saturating_sub(1));
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.clamp(MIN_QUANTITY, MAX_QUANTITY);
    }

    /// Typed quantity
    ///
    /// The leading integer is used (`"12abc"` is 12); text that does not
    /// start with one becomes 1.
    pub fn set_quantity_text(&mut self, text: &str) {
        self.quantity = leading_quantity(text).unwrap_or(MIN_QUANTITY);
    }

    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    pub fn total_display(&self) -> String {
        format_amount(self.total())
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submission(&self) -> OrderSubmission {
        OrderSubmission {
            product_id: Some(self.product_id.clone()),
            quantity: self.quantity,
            name: self.name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }

    /// Run the field rules and keep the messages for display
    pub fn validate(&mut self) -> bool {
        match self.submission().check() {
            Ok(()) => {
                self.errors = FieldErrors::new();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    /// Submit when every field is valid
    ///
    /// Invalid input never reaches the server. On success the customer
    /// fields and quantity reset; field errors returned by the server
    /// replace the local ones.
    pub async fn submit<S: StorefrontApi + ?Sized>(&mut self, api: &S) -> ClientResult<Order> {
        if !self.validate() {
            return Err(ClientError::Validation(self.errors.clone()));
        }

        let submission = self.submission().normalized();
        match api.submit_order(&submission).await {
            Ok(order) => {
                tracing::info!(order_id = %order.id, total = %order.total_price, "Order placed");
                self.reset();
                Ok(order)
            }
            Err(e) => {
                if let Some(errors) = e.field_errors() {
                    self.errors = errors;
                }
                Err(e)
            }
        }
    }

    pub fn reset(&mut self) {
        self.quantity = MIN_QUANTITY;
        self.name.clear();
        self.phone.clear();
        self.address.clear();
        self.errors = FieldErrors::new();
    }
}

impl From<&ProductView> for OrderForm {
    fn from(view: &ProductView) -> Self {
        let mut form = Self::new(&view.product);
        form.unit_price = view.unit_price;
        form
    }
}

/// Clamped value of the integer at the start of `text`
fn leading_quantity(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    if negative {
        return Some(MIN_QUANTITY);
    }
    // Past u32::MAX is still above the cap
    let value = rest[..digits].parse::<u32>().unwrap_or(MAX_QUANTITY);
    Some(value.clamp(MIN_QUANTITY, MAX_QUANTITY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::AppError;
    use shared::OrderStatus;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        submitted: Mutex<Vec<OrderSubmission>>,
        reject_phone: bool,
    }

    #[async_trait]
    impl StorefrontApi for FakeStore {
        async fn product(&self) -> ClientResult<ProductView> {
            let product = Product::builtin();
            Ok(ProductView {
                unit_price: product.unit_price(),
                regular_price: product.regular_unit_price(),
                product,
                pixel_id: None,
            })
        }

        async fn submit_order(&self, submission: &OrderSubmission) -> ClientResult<Order> {
            if self.reject_phone {
                return Err(AppError::from({
                    let mut errors = FieldErrors::new();
                    errors.insert("phone", "Enter a valid mobile number");
                    errors
                })
                .into());
            }
            self.submitted.lock().unwrap().push(submission.clone());
            let unit_price = Decimal::from(1650);
            Ok(Order {
                id: "1".into(),
                product_id: submission.product_id.clone(),
                product_title: "Heater jug".into(),
                unit_price,
                quantity: submission.quantity,
                total_price: unit_price * Decimal::from(submission.quantity),
                name: submission.name.clone(),
                phone: submission.phone.clone(),
                address: submission.address.clone(),
                status: OrderStatus::Pending,
                created_at: Some(chrono::Utc::now()),
            })
        }
    }

    fn filled() -> OrderForm {
        let mut form = OrderForm::new(&Product::builtin());
        form.name = " Rahim ".into();
        form.phone = "01712345678".into();
        form.address = "Mirpur 10, Dhaka".into();
        form
    }

    #[test]
    fn quantity_is_clamped() {
        let mut form = OrderForm::new(&Product::builtin());
        form.decrement();
        assert_eq!(form.quantity(), 1);

        form.set_quantity(1200);
        assert_eq!(form.quantity(), 999);
        form.increment();
        assert_eq!(form.quantity(), 999);

        form.set_quantity_text("abc");
        assert_eq!(form.quantity(), 1);
        form.set_quantity_text(" 12 ");
        assert_eq!(form.quantity(), 12);
        form.set_quantity_text("-5");
        assert_eq!(form.quantity(), 1);
        form.set_quantity_text("99999999999");
        assert_eq!(form.quantity(), 999);
    }

    #[test]
    fn quantity_text_uses_leading_digits() {
        let mut form = OrderForm::new(&Product::builtin());
        form.set_quantity_text("12abc");
        assert_eq!(form.quantity(), 12);
        form.set_quantity_text("+7 pcs");
        assert_eq!(form.quantity(), 7);
        form.set_quantity_text("3.9");
        assert_eq!(form.quantity(), 3);
        form.set_quantity_text("0");
        assert_eq!(form.quantity(), 1);
        form.set_quantity_text("");
        assert_eq!(form.quantity(), 1);
        form.set_quantity_text("x12");
        assert_eq!(form.quantity(), 1);
    }

    #[test]
    fn total_follows_quantity() {
        let mut form = OrderForm::new(&Product::builtin());
        form.set_quantity(2);
        assert_eq!(form.total(), Decimal::from(3300));
        assert_eq!(form.total_display(), "3,300");
    }

    #[tokio::test]
    async fn invalid_form_is_not_sent() {
        let store = FakeStore::default();
        let mut form = OrderForm::new(&Product::builtin());
        form.phone = "123".into();

        let err = form.submit(&store).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(form.errors().contains("name"));
        assert!(form.errors().contains("phone"));
        assert!(form.errors().contains("address"));
        assert!(store.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn successful_submit_resets_form() {
        let store = FakeStore::default();
        let view = store.product().await.unwrap();
        let mut form = OrderForm::from(&view);
        form.name = " Rahim ".into();
        form.phone = "01712345678".into();
        form.address = "Mirpur 10, Dhaka".into();
        form.set_quantity(3);

        let order = form.submit(&store).await.unwrap();
        assert_eq!(order.quantity, 3);
        assert_eq!(order.total_price, Decimal::from(4950));

        let sent = store.submitted.lock().unwrap();
        assert_eq!(sent[0].name, "Rahim");
        assert_eq!(sent[0].product_id.as_deref(), Some("prod-001"));

        assert_eq!(form.quantity(), 1);
        assert!(form.name.is_empty());
        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn server_field_errors_are_shown() {
        let store = FakeStore {
            reject_phone: true,
            ..Default::default()
        };
        let mut form = filled();

        let err = form.submit(&store).await.unwrap_err();
        assert_eq!(err.code(), Some(shared::ErrorCode::ValidationFailed));
        assert_eq!(form.errors().get("phone"), Some("Enter a valid mobile number"));
        // input kept for correction
        assert_eq!(form.name, " Rahim ");
    }
}
