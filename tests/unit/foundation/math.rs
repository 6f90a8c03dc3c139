use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 0), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(255, 128), 128);
}

#[test]
fn luminosity_extremes() {
    assert_eq!(luminosity_u8(255, 255, 255), 255);
    assert_eq!(luminosity_u8(0, 0, 0), 0);
    // green dominates
    assert!(luminosity_u8(0, 255, 0) > luminosity_u8(255, 0, 0));
    assert!(luminosity_u8(255, 0, 0) > luminosity_u8(0, 0, 255));
}
