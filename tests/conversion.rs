//! End-to-end tests for the buffer view converter and graph adapter.

use bytes::Bytes;
use ndarray::{array, ArrayD, IxDyn};
use proptest::prelude::*;

use nifty_common::convert::{to_dyn_view, to_graph, to_view, DynElement, GraphData};
use nifty_common::schema::{BoardState, DataType, NdArray};
use nifty_common::ConvertError;

/// Two nodes, one edge, one edge feature and a `sim_id` side channel.
fn sample_state() -> BoardState {
    let mut state = BoardState::new("0.1.0", "test_suite");
    state.nodes = NdArray::from_array(&array![[1.0f32, 0.0], [0.0, 1.0]]);
    state.edge_index = NdArray::from_array(&array![[0i64], [1]]);
    state.edge_attributes = NdArray::from_array(&array![[0.5f32]]);
    state.insert_auxiliary("sim_id", NdArray::from_vec(vec![1], vec![42i32]));
    state
}

#[test]
fn float32_matrix_converts_read_only() {
    let original = array![[1.5f32, 2.5, 3.5], [4.5, 5.5, 6.5]];
    let msg = NdArray::from_array(&original);

    let converted = to_view::<f32>(&msg, false).unwrap();
    assert_eq!(converted.shape(), &[2, 3]);
    assert_eq!(converted.view(), original.into_dyn());
    assert!(!converted.is_writable());
    assert!(converted.is_borrowed());
}

#[test]
fn default_view_shares_memory_with_message() {
    let msg = NdArray::from_vec(vec![2, 2], vec![1.0f64, 2.0, 3.0, 4.0]);
    let view = to_view::<f64>(&msg, false).unwrap();
    assert_eq!(view.as_ptr() as *const u8, msg.raw_data.as_ptr());

    // Clones of the message share the same buffer, so views of them alias too.
    let copy = msg.clone();
    let other = to_view::<f64>(&copy, false).unwrap();
    assert_eq!(other.as_ptr(), view.as_ptr());
}

#[test]
fn writable_view_is_a_private_copy() {
    let msg = NdArray::from_vec(vec![3], vec![1i64, 2, 3]);
    let before = msg.raw_data.clone();

    let mut converted = to_view::<i64>(&msg, true).unwrap();
    assert!(converted.is_writable());
    converted.view_mut().unwrap()[[0]] = 99;
    assert_eq!(converted.view()[[0]], 99);

    assert_eq!(msg.raw_data, before);
    assert_eq!(to_view::<i64>(&msg, false).unwrap().view()[[0]], 1);
}

#[test]
fn unsupported_dtype_is_recoverable() {
    let msg = NdArray {
        dtype: 999,
        shape: vec![1],
        raw_data: Bytes::from_static(b"\x00"),
    };
    let err = to_dyn_view(&msg, false).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedDType(999)));
    assert_eq!(err.to_string(), "unsupported dtype enum value 999");
}

#[test]
fn shape_mismatch_detected_at_view_time() {
    // Building the message is fine; only the view notices.
    let msg = NdArray::new(DataType::Int32, vec![4], vec![0u8; 12]);
    assert!(matches!(
        to_view::<i32>(&msg, false),
        Err(ConvertError::ShapeMismatch {
            expected: 16,
            actual: 12,
            ..
        })
    ));
}

#[test]
fn graph_conversion() {
    let state = sample_state();
    let data = to_graph(&state, true).unwrap();

    assert_eq!(data.x.shape(), &[2, 2]);
    assert_eq!(data.edge_index.shape(), &[2, 1]);
    assert_eq!(
        data.edge_attr.as_ref().unwrap().typed::<f32>().unwrap().view(),
        array![[0.5f32]].into_dyn()
    );
    assert_eq!(
        data.get("sim_id").unwrap().typed::<i32>().unwrap().view(),
        array![42i32].into_dyn()
    );
}

#[test]
fn graph_omits_empty_edge_attributes() {
    let mut state = sample_state();
    state.edge_attributes = NdArray::default();
    let data = GraphData::try_from(&state).unwrap();
    assert!(data.edge_attr.is_none());
    assert!(data.get("edge_attr").is_none());
}

#[test]
fn graph_passes_through_every_auxiliary_key() {
    let mut state = sample_state();
    state.insert_auxiliary("labels", NdArray::from_vec(vec![2], vec![3u8, 4]));
    state.insert_auxiliary("rewards", NdArray::from_vec(vec![2, 1], vec![0.25f64, -1.0]));

    let data = to_graph(&state, false).unwrap();
    for (key, array) in &state.auxiliary_data {
        let view = data.get(key).unwrap_or_else(|| panic!("missing field {}", key));
        assert_eq!(view.dtype(), array.data_type().unwrap());
        let expected: Vec<u64> = view.shape().iter().map(|&d| d as u64).collect();
        assert_eq!(expected, array.shape);
    }
    assert_eq!(
        data.get("rewards").unwrap().typed::<f64>().unwrap().view(),
        ArrayD::from_shape_vec(IxDyn(&[2, 1]), vec![0.25f64, -1.0]).unwrap()
    );
}

fn check_roundtrip<T: DynElement>(shape: Vec<u64>, values: Vec<T>) -> Result<(), TestCaseError> {
    let msg = NdArray::from_vec(shape.clone(), values.clone());
    let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();

    let view = to_view::<T>(&msg, false).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(view.shape(), dims.as_slice());
    prop_assert_eq!(view.view().iter().copied().collect::<Vec<T>>(), values.clone());

    let dynamic = to_dyn_view(&msg, true).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(dynamic.dtype(), T::DTYPE);
    prop_assert!(dynamic.is_writable());
    let typed = dynamic.typed::<T>().ok_or_else(|| TestCaseError::fail("wrong variant"))?;
    prop_assert_eq!(typed.view().iter().copied().collect::<Vec<T>>(), values);
    Ok(())
}

/// A shape of rank 1..=3 together with its element count.
fn shape_strategy() -> impl Strategy<Value = (Vec<u64>, usize)> {
    prop::collection::vec(0u64..5, 1..4).prop_map(|shape| {
        let n = shape.iter().product::<u64>() as usize;
        (shape, n)
    })
}

proptest! {
    #[test]
    fn roundtrip_f32((shape, values) in shape_strategy().prop_flat_map(|(s, n)| {
        (Just(s), prop::collection::vec(-1.0e6f32..1.0e6, n))
    })) {
        check_roundtrip(shape, values)?;
    }

    #[test]
    fn roundtrip_f64((shape, values) in shape_strategy().prop_flat_map(|(s, n)| {
        (Just(s), prop::collection::vec(-1.0e12f64..1.0e12, n))
    })) {
        check_roundtrip(shape, values)?;
    }

    #[test]
    fn roundtrip_i64((shape, values) in shape_strategy().prop_flat_map(|(s, n)| {
        (Just(s), prop::collection::vec(any::<i64>(), n))
    })) {
        check_roundtrip(shape, values)?;
    }

    #[test]
    fn roundtrip_i32((shape, values) in shape_strategy().prop_flat_map(|(s, n)| {
        (Just(s), prop::collection::vec(any::<i32>(), n))
    })) {
        check_roundtrip(shape, values)?;
    }

    #[test]
    fn roundtrip_u8((shape, values) in shape_strategy().prop_flat_map(|(s, n)| {
        (Just(s), prop::collection::vec(any::<u8>(), n))
    })) {
        check_roundtrip(shape, values)?;
    }
}
