use super::*;

#[test]
fn over_transparent_src_is_noop() {
    let mut dst = vec![10, 20, 30, 255];
    premul_over_in_place(&mut dst, &[200, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn over_opaque_src_replaces_dst() {
    let mut dst = vec![10, 20, 30, 255];
    premul_over_in_place(&mut dst, &[1, 2, 3, 255]).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255]);
}

#[test]
fn over_half_alpha_blends() {
    let mut dst = vec![0, 0, 200, 255];
    premul_over_in_place(&mut dst, &[128, 0, 0, 128]).unwrap();
    assert_eq!(dst[3], 255);
    assert_eq!(dst[0], 128);
    assert_eq!(dst[2], 100);
}

#[test]
fn mismatched_lengths_error() {
    let mut dst = vec![0u8; 8];
    assert!(premul_over_in_place(&mut dst, &[0u8; 4]).is_err());
    assert!(premul_multiply_in_place(&mut dst, &[0u8; 4]).is_err());
}

#[test]
fn multiply_with_white_is_identity_and_with_black_darkens() {
    let mut dst = vec![200, 100, 50, 255];
    premul_multiply_in_place(&mut dst, &[255, 255, 255, 255]).unwrap();
    assert_eq!(dst, vec![200, 100, 50, 255]);

    premul_multiply_in_place(&mut dst, &[0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![0, 0, 0, 255]);
}

#[test]
fn multiply_onto_transparent_keeps_source() {
    let mut dst = vec![0, 0, 0, 0];
    premul_multiply_in_place(&mut dst, &[60, 30, 0, 128]).unwrap();
    assert_eq!(dst, vec![60, 30, 0, 128]);
}

#[test]
fn unpremultiply_restores_straight_channels() {
    let mut px = vec![64, 32, 0, 128, 9, 9, 9, 0];
    unpremultiply_in_place(&mut px);
    assert_eq!(px, vec![128, 64, 0, 128, 0, 0, 0, 0]);
}
