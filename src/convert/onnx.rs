//! ONNX Runtime sink for graph aggregates.
//!
//! Copies each view into an owned `ort` tensor in row-major order so a
//! `GraphData` can be fed straight into a session as named inputs.

use ort::tensor::PrimitiveTensorElementType;
use ort::value::{DynValue, Value};

use crate::schema::Element;

use super::graph::GraphData;
use super::view::{DynView, TensorView};

impl DynView<'_> {
    /// Copies this view into an ONNX Runtime tensor value.
    pub fn to_onnx_value(&self) -> ort::Result<DynValue> {
        match self {
            DynView::Float32(v) => tensor_value(v),
            DynView::Float64(v) => tensor_value(v),
            DynView::Int64(v) => tensor_value(v),
            DynView::Int32(v) => tensor_value(v),
            DynView::Uint8(v) => tensor_value(v),
        }
    }
}

impl GraphData<'_> {
    /// Named session inputs: `x`, `edge_index`, `edge_attr` when present,
    /// then every auxiliary entry in key order.
    pub fn to_onnx_inputs(&self) -> ort::Result<Vec<(String, DynValue)>> {
        let mut inputs = Vec::with_capacity(3 + self.extras().len());
        inputs.push(("x".to_string(), self.x.to_onnx_value()?));
        inputs.push(("edge_index".to_string(), self.edge_index.to_onnx_value()?));
        if let Some(attr) = &self.edge_attr {
            inputs.push(("edge_attr".to_string(), attr.to_onnx_value()?));
        }

        let mut keys: Vec<&String> = self.extras().keys().collect();
        keys.sort();
        for key in keys {
            let value = self.extras()[key].to_onnx_value()?;
            // Auxiliary entries replace like-named core inputs.
            match inputs.iter_mut().find(|(name, _)| name == key) {
                Some(slot) => slot.1 = value,
                None => inputs.push((key.clone(), value)),
            }
        }
        Ok(inputs)
    }
}

fn tensor_value<T>(view: &TensorView<'_, T>) -> ort::Result<DynValue>
where
    T: Element + PrimitiveTensorElementType,
{
    let array = view.view();
    let shape: Vec<i64> = array.shape().iter().map(|&d| d as i64).collect();
    let data: Vec<T> = array.iter().copied().collect();
    Ok(Value::from_array((shape, data))?.into_dyn())
}
