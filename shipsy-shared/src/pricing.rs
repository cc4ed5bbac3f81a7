/// Shipment pricing
///
/// The cost of a shipment is derived entirely from its physical attributes:
///
/// ```text
/// cost = weight_kg * base_rate + distance_km * 0.5
/// ```
///
/// The result is stored on the shipment but is never taken from client
/// input. [`crate::shipments::ShipmentRepository`] calls [`compute_cost`] on
/// every create and update.
///
/// # Example
///
/// ```
/// use shipsy_shared::pricing::compute_cost;
///
/// assert_eq!(compute_cost(10.0, 20.0, 5.0), 60.0);
/// ```

/// Flat per-kilometre charge added on top of the weight-based rate
pub const DISTANCE_RATE_PER_KM: f64 = 0.5;

/// Computes the cost of a shipment
pub fn compute_cost(weight_kg: f64, distance_km: f64, base_rate: f64) -> f64 {
    weight_kg * base_rate + distance_km * DISTANCE_RATE_PER_KM
}
