use rulinalg::matrix::{BaseMatrix, Matrix};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// Write a matrix out as a list of its rows, so each output unit's weights read as one vector
pub fn serialize_matrix<S: Serializer>(
    matrix: &Matrix<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let rows: Vec<&[f64]> = if matrix.cols() == 0 {
        vec![]
    } else {
        matrix.data().chunks_exact(matrix.cols()).collect()
    };

    rows.serialize(serializer)
}

/// Read a matrix back from a list of rows, refusing empty or ragged input
pub fn deserialize_matrix_rows<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Matrix<f64>, D::Error> {
    let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
    let cols = match rows.first() {
        Some(first) if !first.is_empty() => first.len(),
        _ => return Err(D::Error::custom("weight matrix must have non-empty rows")),
    };

    if let Some(ragged) = rows.iter().find(|row| row.len() != cols) {
        return Err(D::Error::custom(format!(
            "ragged weight matrix: row of {} where {cols} expected",
            ragged.len()
        )));
    }

    let n_rows = rows.len();
    Ok(Matrix::new(n_rows, cols, rows.concat()))
}
