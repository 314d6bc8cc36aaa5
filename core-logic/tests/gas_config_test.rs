use core_logic::{GasConfig, OperationShape};

#[test]
fn test_shape_boundaries() {
    let config = GasConfig::default();
    assert_eq!(config.shape_for(Some(1001)), OperationShape::Creation);
    assert_eq!(config.shape_for(Some(1000)), OperationShape::Call);
    assert_eq!(config.shape_for(Some(1)), OperationShape::Call);
    assert_eq!(config.shape_for(Some(0)), OperationShape::Transfer);
    assert_eq!(config.shape_for(None), OperationShape::Transfer);
}

#[test]
fn test_fallback_limits_by_payload() {
    let config = GasConfig::default();
    assert_eq!(config.fallback_limit_for(Some(5000)), 4_000_000);
    assert_eq!(config.fallback_limit_for(Some(68)), 500_000);
    assert_eq!(config.fallback_limit_for(None), 30_000);
}

#[test]
fn test_custom_fallback_price() {
    let config = GasConfig::new().with_fallback_price(2.5);
    assert_eq!(config.fallback_price_wei(), 2_500_000_000);
}
