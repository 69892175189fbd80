use super::*;

#[test]
fn test_from_vec() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-12);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-12);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0_f64, 2.0, 3.0]);
    assert!(result.is_err());
}

#[test]
fn test_zeros() {
    let m = Matrix::zeros(2, 3);
    assert_eq!(m.shape(), (2, 3));
    assert!(m.as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn test_from_columns() {
    let m = Matrix::from_columns(2, &[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]])
        .expect("every column has 2 rows");
    assert_eq!(m.shape(), (2, 3));
    assert_eq!(m.column(1).as_slice(), &[3.0, 4.0]);
    assert_eq!(m.as_slice(), &[1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
}

#[test]
fn test_from_columns_ragged() {
    assert!(Matrix::from_columns(2, &[&[1.0, 2.0], &[3.0]]).is_err());
}

#[test]
fn test_column_major_roundtrip() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let cm = m.to_column_major();
    assert_eq!(cm, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

    let back = Matrix::from_column_major(2, 3, &cm).expect("length matches");
    assert_eq!(back, m);
}

#[test]
fn test_transpose() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let t = m.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert!((t.get(0, 0) - 1.0).abs() < 1e-12);
    assert!((t.get(0, 1) - 4.0).abs() < 1e-12);
    assert!((t.get(2, 1) - 6.0).abs() < 1e-12);
}

#[test]
fn test_set_column() {
    let mut m = Matrix::zeros(3, 2);
    m.set_column(1, &[7.0, 8.0, 9.0]);
    assert_eq!(m.column(1).as_slice(), &[7.0, 8.0, 9.0]);
    assert_eq!(m.column(0).as_slice(), &[0.0, 0.0, 0.0]);
}

#[test]
fn test_matmul() {
    // 2x3 * 3x2 = 2x2
    let a = Matrix::from_vec(2, 3, vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let b = Matrix::from_vec(3, 2, vec![7.0_f64, 8.0, 9.0, 10.0, 11.0, 12.0])
        .expect("test data has correct dimensions: 3*2=6 elements");
    let c = a
        .matmul(&b)
        .expect("matrix dimensions are compatible for multiplication: 2x3 * 3x2");

    assert_eq!(c.shape(), (2, 2));
    // c[0,0] = 1*7 + 2*9 + 3*11 = 58
    assert!((c.get(0, 0) - 58.0).abs() < 1e-12);
    // c[0,1] = 1*8 + 2*10 + 3*12 = 64
    assert!((c.get(0, 1) - 64.0).abs() < 1e-12);
    // c[1,0] = 4*7 + 5*9 + 6*11 = 139
    assert!((c.get(1, 0) - 139.0).abs() < 1e-12);
    // c[1,1] = 4*8 + 5*10 + 6*12 = 154
    assert!((c.get(1, 1) - 154.0).abs() < 1e-12);
}

#[test]
fn test_matmul_dimension_error() {
    let a = Matrix::ones(2, 3);
    let b = Matrix::ones(2, 2);
    assert!(a.matmul(&b).is_err());
}

#[test]
fn test_zip_map() {
    let a = Matrix::from_vec(1, 3, vec![1.0_f64, 4.0, 9.0]).expect("1x3");
    let b = Matrix::from_vec(1, 3, vec![1.0_f64, 2.0, 3.0]).expect("1x3");
    let c = a.zip_map(&b, |x, y| x / y).expect("same shape");
    assert_eq!(c.as_slice(), &[1.0, 2.0, 3.0]);
}

#[test]
fn test_column_sums() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.column_sums().as_slice(), &[5.0, 7.0, 9.0]);
}

#[test]
fn test_column_sums_empty() {
    let m = Matrix::zeros(0, 3);
    assert_eq!(m.column_sums().as_slice(), &[0.0, 0.0, 0.0]);
}

#[test]
fn test_add_row_broadcast() {
    let mut m = Matrix::zeros(2, 2);
    m.add_row_broadcast(&Vector::from_slice(&[1.0, -1.0]))
        .expect("length matches rows");
    assert_eq!(m.as_slice(), &[1.0, 1.0, -1.0, -1.0]);

    assert!(m.add_row_broadcast(&Vector::from_slice(&[1.0])).is_err());
}

#[test]
fn test_set() {
    let mut m = Matrix::zeros(2, 2);
    m.set(0, 1, 5.0);
    assert!((m.get(0, 1) - 5.0).abs() < 1e-12);
}
