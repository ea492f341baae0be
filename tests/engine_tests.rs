mod common;

use approx::assert_relative_eq;
use common::{engine_with_mock, ids, m1, m2, Call};
use gridstore::{EngineError, Matrix, Operation, Shape};

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let (engine, _) = engine_with_mock();
    let input = m1().with_metadata("unit", "ms");

    let stored = engine.create(input.clone()).await.unwrap();
    let fetched = engine.get("m1").await.expect("stored matrix should be visible");

    assert_eq!(fetched, stored);
    // Everything except the server-assigned timestamp is preserved
    assert_eq!(Matrix { timestamp: input.timestamp, ..fetched }, input);
}

#[tokio::test]
async fn test_create_overwrites_same_id() {
    let (engine, _) = engine_with_mock();
    engine.create(m1()).await.unwrap();
    let replacement = Matrix::new("m1", "Replacement", vec![vec![9.0]]);
    engine.create(replacement).await.unwrap();

    let fetched = engine.get("m1").await.unwrap();
    assert_eq!(fetched.name, "Replacement");
    assert_eq!(fetched.data, vec![vec![9.0]]);
    assert_eq!(engine.len().await, 1);
}

#[tokio::test]
async fn test_timestamps_strictly_increase() {
    let (engine, _) = engine_with_mock();
    let a = engine.create(m1()).await.unwrap();
    let b = engine.create(m2()).await.unwrap();
    let c = engine.add("m1", "m2", None).await.unwrap();
    assert!(a.timestamp < b.timestamp);
    assert!(b.timestamp < c.timestamp);
}

#[tokio::test]
async fn test_invalid_create_leaves_table_unchanged() {
    let (engine, mock) = engine_with_mock();
    engine.create(m1()).await.unwrap();
    let before = ids(&engine).await;
    mock.clear();

    // Row count disagrees with declared rows
    let short = Matrix::with_shape("bad1", "Bad", 3, 2, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    let err = engine.create(short).await.unwrap_err();
    assert_eq!(err.field, "data");

    // One row of the wrong length
    let ragged = Matrix::with_shape("bad2", "Bad", 2, 2, vec![vec![1.0, 2.0], vec![3.0]]);
    let err = engine.create(ragged).await.unwrap_err();
    assert_eq!(err.field, "data[1]");

    // Overwrite attempt of an existing id with a bad shape
    let zero = Matrix::with_shape("m1", "Bad", 0, 2, vec![]);
    assert_eq!(engine.create(zero).await.unwrap_err().field, "rows");

    assert_eq!(ids(&engine).await, before);
    assert_eq!(engine.get("m1").await.unwrap().data, m1().data);
    assert!(mock.calls().is_empty(), "Rejected creates must not report telemetry");
}

#[tokio::test]
async fn test_add_and_subtract_elementwise() {
    let (engine, _) = engine_with_mock();
    engine.create(m1()).await.unwrap();
    engine.create(m2()).await.unwrap();

    let sum = engine.add("m1", "m2", None).await.unwrap();
    assert_eq!(sum.id, "m1_add_m2");
    assert_eq!(sum.name, "Test Matrix 1 + Test Matrix 2");
    assert_eq!(sum.shape(), Shape { rows: 2, columns: 2 });
    assert_eq!(sum.data, vec![vec![6.0, 8.0], vec![10.0, 12.0]]);

    let diff = engine.subtract("m1", "m2", Some("d")).await.unwrap();
    assert_eq!(diff.id, "d");
    assert_eq!(diff.name, "Test Matrix 1 - Test Matrix 2");
    assert_eq!(diff.data, vec![vec![-4.0, -4.0], vec![-4.0, -4.0]]);

    // Results are persisted under their ids
    assert_eq!(engine.get("m1_add_m2").await.unwrap(), sum);
    assert_eq!(engine.get("d").await.unwrap(), diff);
}

#[tokio::test]
async fn test_add_mismatch_writes_nothing() {
    let (engine, mock) = engine_with_mock();
    engine.create(m1()).await.unwrap();
    engine
        .create(Matrix::new("tall", "Tall", vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]))
        .await
        .unwrap();
    mock.clear();

    let err = engine.add("m1", "tall", None).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::DimensionMismatch {
            operation: Operation::Add,
            left: Shape { rows: 2, columns: 2 },
            right: Shape { rows: 3, columns: 2 },
        }
    );
    assert!(engine.get("m1_add_tall").await.is_none());
    assert_eq!(engine.len().await, 2);
    assert!(mock.operations().is_empty());
}

#[tokio::test]
async fn test_missing_operand_is_not_found() {
    let (engine, _) = engine_with_mock();
    engine.create(m1()).await.unwrap();

    assert_eq!(
        engine.add("m1", "ghost", None).await.unwrap_err(),
        EngineError::NotFound { id: "ghost".into() }
    );
    assert_eq!(
        engine.multiply("ghost", "m1", None).await.unwrap_err(),
        EngineError::NotFound { id: "ghost".into() }
    );
    assert_eq!(
        engine.transpose("ghost", None).await.unwrap_err(),
        EngineError::NotFound { id: "ghost".into() }
    );
    assert_eq!(
        engine.statistics("ghost").await.unwrap_err(),
        EngineError::NotFound { id: "ghost".into() }
    );
    assert_eq!(ids(&engine).await, vec!["m1".to_string()]);
}

#[tokio::test]
async fn test_multiply_known_product() {
    let (engine, _) = engine_with_mock();
    engine.create(m1()).await.unwrap();
    engine.create(m2()).await.unwrap();

    let product = engine.multiply("m1", "m2", None).await.unwrap();
    assert_eq!(product.id, "m1_multiply_m2");
    assert_eq!(product.name, "Test Matrix 1 * Test Matrix 2");
    assert_eq!(product.data, vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
}

#[tokio::test]
async fn test_multiply_shapes() {
    let (engine, _) = engine_with_mock();
    // 2x3 * 3x2 -> 2x2
    engine.create(Matrix::new("a", "A", vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])).await.unwrap();
    engine.create(Matrix::new("b", "B", vec![vec![7.0, 8.0], vec![9.0, 10.0], vec![11.0, 12.0]])).await.unwrap();

    let ab = engine.multiply("a", "b", Some("ab")).await.unwrap();
    assert_eq!(ab.shape(), Shape { rows: 2, columns: 2 });
    assert_eq!(ab.data, vec![vec![58.0, 64.0], vec![139.0, 154.0]]);

    let ba = engine.multiply("b", "a", Some("ba")).await.unwrap();
    assert_eq!(ba.shape(), Shape { rows: 3, columns: 3 });

    // 2x3 * 2x3 is undefined
    let err = engine.multiply("a", "a", None).await.unwrap_err();
    assert!(matches!(err, EngineError::DimensionMismatch { operation: Operation::Multiply, .. }));
    assert!(engine.get("a_multiply_a").await.is_none());
}

#[tokio::test]
async fn test_transpose_values_and_involution() {
    let (engine, _) = engine_with_mock();
    engine.create(m1()).await.unwrap();

    let t = engine.transpose("m1", None).await.unwrap();
    assert_eq!(t.id, "m1_transpose");
    assert_eq!(t.name, "Test Matrix 1 Transposed");
    assert_eq!(t.data, vec![vec![1.0, 3.0], vec![2.0, 4.0]]);

    let wide = Matrix::new("w", "Wide", vec![vec![1.5, -2.0, 3.25]]);
    engine.create(wide.clone()).await.unwrap();
    engine.transpose("w", Some("wt")).await.unwrap();
    let back = engine.transpose("wt", Some("wtt")).await.unwrap();
    assert_eq!(back.shape(), wide.shape());
    assert_eq!(back.data, wide.data);
}

#[tokio::test]
async fn test_statistics_values() {
    let (engine, mock) = engine_with_mock();
    engine.create(m1()).await.unwrap();
    let before = ids(&engine).await;

    let stats = engine.statistics("m1").await.unwrap();
    assert_eq!(stats.matrix_id, "m1");
    assert_eq!(stats.mean, 2.5);
    assert_eq!(stats.sum, 10.0);
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 4.0);
    assert_eq!(stats.variance, 1.25);
    assert_relative_eq!(stats.standard_deviation, 1.118, epsilon = 1e-3);

    // Reported exactly once, and nothing written to the table
    let reported: Vec<_> = mock
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Statistics(..)))
        .collect();
    assert_eq!(reported, vec![Call::Statistics("m1".into(), stats.clone())]);
    assert_eq!(ids(&engine).await, before);
}

#[tokio::test]
async fn test_delete_semantics() {
    let (engine, mock) = engine_with_mock();
    engine.create(m1()).await.unwrap();
    engine.create(m2()).await.unwrap();
    mock.clear();

    assert!(!engine.delete("ghost").await);
    assert!(mock.entry_counts().is_empty(), "A miss reports no entry-count change");

    assert!(engine.delete("m1").await);
    assert!(engine.get("m1").await.is_none());
    assert_eq!(mock.entry_counts(), vec![1]);
    assert_eq!(mock.operations(), vec![Operation::Delete]);

    assert!(!engine.delete("m1").await);
}

#[tokio::test]
async fn test_create_reports_count_and_size() {
    let (engine, mock) = engine_with_mock();
    engine.create(m1()).await.unwrap();
    engine.create(Matrix::new("row", "Row", vec![vec![1.0, 2.0, 3.0]])).await.unwrap();

    assert_eq!(
        mock.calls(),
        vec![
            Call::Operation(Operation::Create),
            Call::EntryCount(1),
            Call::EntrySize("m1".into(), 4),
            Call::Operation(Operation::Create),
            Call::EntryCount(2),
            Call::EntrySize("row".into(), 3),
        ]
    );
}

#[tokio::test]
async fn test_each_compute_operation_is_timed() {
    let (engine, mock) = engine_with_mock();
    engine.create(m1()).await.unwrap();
    engine.create(m2()).await.unwrap();
    mock.clear();

    engine.add("m1", "m2", None).await.unwrap();
    engine.subtract("m1", "m2", None).await.unwrap();
    engine.multiply("m1", "m2", None).await.unwrap();
    engine.transpose("m1", None).await.unwrap();
    engine.statistics("m1").await.unwrap();

    assert_eq!(
        mock.operations(),
        vec![
            Operation::Add,
            Operation::Subtract,
            Operation::Multiply,
            Operation::Transpose,
            Operation::Statistics,
        ]
    );
}

#[tokio::test]
async fn test_result_id_collision_overwrites() {
    let (engine, _) = engine_with_mock();
    engine.create(m1()).await.unwrap();
    engine.create(m2()).await.unwrap();
    engine.create(Matrix::new("m1_add_m2", "Occupant", vec![vec![0.0]])).await.unwrap();

    engine.add("m1", "m2", None).await.unwrap();
    let replaced = engine.get("m1_add_m2").await.unwrap();
    assert_eq!(replaced.name, "Test Matrix 1 + Test Matrix 2");

    // Writing the result over an operand is allowed too
    engine.add("m1", "m2", Some("m1")).await.unwrap();
    assert_eq!(engine.get("m1").await.unwrap().data, vec![vec![6.0, 8.0], vec![10.0, 12.0]]);
}

#[tokio::test]
async fn test_close_clears_and_closes_port_once() {
    let (engine, mock) = engine_with_mock();
    engine.create(m1()).await.unwrap();

    engine.close().await;
    engine.close().await;

    assert!(engine.is_empty().await);
    assert_eq!(mock.close_count(), 1);
}

#[tokio::test]
async fn test_statistics_with_nan_element() {
    let (engine, _) = engine_with_mock();
    engine.create(Matrix::new("n", "NaN", vec![vec![1.0, f64::NAN], vec![3.0, 4.0]])).await.unwrap();

    let stats = engine.statistics("n").await.unwrap();
    assert!(stats.mean.is_nan());
    assert!(stats.sum.is_nan());
    assert!(stats.min.is_nan() && stats.max.is_nan());
}
