//! Checkout module: pricing, orders, and the placement sequence.

mod address;
mod flow;
mod order;
mod pricing;
mod writer;

pub use address::{AddressDraft, AddressService, UserAddress};
pub use flow::checkout;
pub use order::{DeliveryDetails, Order, OrderItem, OrderStatus};
pub use pricing::{quote, OrderPricing, DELIVERY_FEE_CENTS, TAX_RATE_PERCENT};
pub use writer::place_order;
