//! Checkout summary and coupon discount math.
//!
//! Amounts are integer minor currency units. A discount never exceeds the subtotal, so the total
//! can reach zero but never go negative.

// self
use crate::_prelude::*;

/// Reasons a coupon cannot be applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CheckoutError {
	/// Coupon has been deactivated by staff.
	#[error("Coupon `{code}` is no longer active.")]
	Inactive {
		/// Coupon code.
		code: String,
	},
	/// Coupon expiry has passed.
	#[error("Coupon `{code}` has expired.")]
	Expired {
		/// Coupon code.
		code: String,
	},
	/// Cart subtotal is below the coupon's minimum order value.
	#[error("Coupon `{code}` requires a subtotal of at least {minimum}.")]
	BelowMinimum {
		/// Coupon code.
		code: String,
		/// Required subtotal.
		minimum: u64,
	},
	/// Percentage discounts must lie in `1..=100`.
	#[error("Coupon `{code}` has an invalid percentage: {percent}.")]
	InvalidPercentage {
		/// Coupon code.
		code: String,
		/// Offending value.
		percent: u64,
	},
}

/// How a coupon's `discount_value` is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
	/// Percentage of the subtotal, rounded down.
	Percentage,
	/// Fixed amount in minor units.
	Fixed,
}

/// Coupon as returned by `GET /coupons`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
	/// Code the customer types in.
	pub code: String,
	/// Discount rule.
	pub discount_type: DiscountType,
	/// Percentage (`1..=100`) or minor-unit amount, per [`Coupon::discount_type`].
	pub discount_value: u64,
	/// Minimum subtotal the coupon applies to.
	#[serde(default)]
	pub min_order_value: Option<u64>,
	/// Expiry instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub expires_at: Option<OffsetDateTime>,
	/// Staff-controlled activation flag.
	#[serde(default = "active_by_default")]
	pub is_active: bool,
}
impl Coupon {
	/// Active coupon with no minimum or expiry.
	pub fn new(code: impl Into<String>, discount_type: DiscountType, discount_value: u64) -> Self {
		Self {
			code: code.into(),
			discount_type,
			discount_value,
			min_order_value: None,
			expires_at: None,
			is_active: true,
		}
	}

	/// Discount this coupon grants on `subtotal` at `now`.
	pub fn discount_for(&self, subtotal: u64, now: OffsetDateTime) -> Result<u64, CheckoutError> {
		if !self.is_active {
			return Err(CheckoutError::Inactive { code: self.code.clone() });
		}
		if self.expires_at.is_some_and(|expires_at| expires_at <= now) {
			return Err(CheckoutError::Expired { code: self.code.clone() });
		}
		if let Some(minimum) = self.min_order_value.filter(|minimum| subtotal < *minimum) {
			return Err(CheckoutError::BelowMinimum { code: self.code.clone(), minimum });
		}

		let discount = match (self.discount_type, self.discount_value) {
			(DiscountType::Percentage, percent) if (1..=100).contains(&percent) =>
				subtotal / 100 * percent + subtotal % 100 * percent / 100,
			(DiscountType::Percentage, percent) =>
				return Err(CheckoutError::InvalidPercentage { code: self.code.clone(), percent }),
			(DiscountType::Fixed, amount) => amount,
		};

		Ok(discount.min(subtotal))
	}
}

fn active_by_default() -> bool {
	true
}

/// One cart line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
	/// Product identifier.
	pub product_id: u64,
	/// Unit price in minor units.
	pub unit_price: u64,
	/// Quantity ordered.
	pub quantity: u32,
}
impl CartLine {
	/// Price × quantity, saturating on overflow.
	pub fn line_total(&self) -> u64 {
		self.unit_price.saturating_mul(u64::from(self.quantity))
	}
}

/// Totals shown in the checkout summary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
	/// Sum of line totals.
	pub subtotal: u64,
	/// Coupon discount.
	pub discount: u64,
	/// Amount due.
	pub total: u64,
	/// Applied coupon code.
	pub coupon_code: Option<String>,
}
impl CheckoutSummary {
	/// Summarizes `lines`, applying `coupon` if given, using the current time for expiry.
	pub fn compute(lines: &[CartLine], coupon: Option<&Coupon>) -> Result<Self, CheckoutError> {
		Self::compute_at(lines, coupon, OffsetDateTime::now_utc())
	}

	/// Summarizes `lines` treating `now` as the current instant.
	pub fn compute_at(
		lines: &[CartLine],
		coupon: Option<&Coupon>,
		now: OffsetDateTime,
	) -> Result<Self, CheckoutError> {
		let subtotal =
			lines.iter().fold(0_u64, |acc, line| acc.saturating_add(line.line_total()));
		let discount = match coupon {
			Some(coupon) => coupon.discount_for(subtotal, now)?,
			None => 0,
		};

		Ok(Self {
			subtotal,
			discount,
			total: subtotal - discount,
			coupon_code: coupon.map(|coupon| coupon.code.clone()),
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	fn cart() -> Vec<CartLine> {
		vec![
			CartLine { product_id: 1, unit_price: 25_000, quantity: 2 },
			CartLine { product_id: 2, unit_price: 13_999, quantity: 1 },
		]
	}

	#[test]
	fn summary_without_coupon() {
		let summary = CheckoutSummary::compute(&cart(), None).expect("Plain cart should sum.");

		assert_eq!(summary.subtotal, 63_999);
		assert_eq!(summary.discount, 0);
		assert_eq!(summary.total, 63_999);
		assert!(summary.coupon_code.is_none());
	}

	#[test]
	fn percentage_discounts_round_down() {
		let coupon = Coupon::new("GLOW15", DiscountType::Percentage, 15);
		let summary =
			CheckoutSummary::compute(&cart(), Some(&coupon)).expect("Coupon should apply.");

		assert_eq!(summary.discount, 9_599);
		assert_eq!(summary.total, 54_400);
		assert_eq!(summary.coupon_code.as_deref(), Some("GLOW15"));
	}

	#[test]
	fn fixed_discounts_are_capped_at_the_subtotal() {
		let coupon = Coupon::new("BIGSAVE", DiscountType::Fixed, 1_000_000);
		let summary =
			CheckoutSummary::compute(&cart(), Some(&coupon)).expect("Coupon should apply.");

		assert_eq!(summary.discount, summary.subtotal);
		assert_eq!(summary.total, 0);
	}

	#[test]
	fn coupon_preconditions_are_enforced() {
		let now = datetime!(2025-06-01 12:00 UTC);
		let expired = Coupon {
			expires_at: Some(datetime!(2025-05-31 23:59 UTC)),
			..Coupon::new("SPRING", DiscountType::Fixed, 500)
		};
		let minimum =
			Coupon { min_order_value: Some(100_000), ..Coupon::new("VIP", DiscountType::Fixed, 500) };
		let inactive = Coupon { is_active: false, ..Coupon::new("OLD", DiscountType::Fixed, 500) };
		let broken = Coupon::new("TYPO", DiscountType::Percentage, 150);

		assert!(matches!(
			CheckoutSummary::compute_at(&cart(), Some(&expired), now),
			Err(CheckoutError::Expired { .. })
		));
		assert_eq!(
			CheckoutSummary::compute_at(&cart(), Some(&minimum), now),
			Err(CheckoutError::BelowMinimum { code: "VIP".into(), minimum: 100_000 }),
		);
		assert!(matches!(
			CheckoutSummary::compute_at(&cart(), Some(&inactive), now),
			Err(CheckoutError::Inactive { .. })
		));
		assert!(matches!(
			CheckoutSummary::compute_at(&cart(), Some(&broken), now),
			Err(CheckoutError::InvalidPercentage { percent: 150, .. })
		));
	}

	#[test]
	fn coupons_deserialize_from_backend_json() {
		let coupon: Coupon = serde_json::from_str(
			r#"{"code":"DEW10","discountType":"percentage","discountValue":10,
				"minOrderValue":20000,"expiresAt":"2030-01-01T00:00:00Z"}"#,
		)
		.expect("Coupon should deserialize.");

		assert_eq!(coupon.discount_type, DiscountType::Percentage);
		assert_eq!(coupon.discount_value, 10);
		assert_eq!(coupon.min_order_value, Some(20_000));
		assert!(coupon.is_active);
		assert_eq!(coupon.expires_at, Some(datetime!(2030-01-01 00:00 UTC)));
	}
}
