use serde::Serialize;

/// Pairwise Pearson correlation of keyword presence across titles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub keywords: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }
}

/// Rows are titles, columns keywords; 1 when the keyword occurs anywhere in
/// the lowercased title (substring match, not token match).
pub fn presence_matrix<T: AsRef<str>>(keywords: &[String], titles: &[T]) -> Vec<Vec<f64>> {
    titles
        .iter()
        .map(|title| {
            let lower = title.as_ref().to_lowercase();
            keywords
                .iter()
                .map(|k| if lower.contains(k.as_str()) { 1.0 } else { 0.0 })
                .collect()
        })
        .collect()
}

fn column(matrix: &[Vec<f64>], idx: usize) -> Vec<f64> {
    matrix.iter().map(|row| row[idx]).collect()
}

fn centered(values: &[f64]) -> Vec<f64> {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| v - mean).collect()
}

/// Pearson r of two equally long centered columns; 0 when undefined
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let cov: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let var_x: f64 = x.iter().map(|a| a * a).sum();
    let var_y: f64 = y.iter().map(|b| b * b).sum();
    let denom = (var_x * var_y).sqrt();

    let r = cov / denom;
    if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 }
}

/// Correlate the presence of `keywords` across `titles`.
///
/// Returns `None` when there is too little data: fewer than two keywords or
/// no titles. Columns with zero variance correlate as 0, including with
/// themselves.
pub fn compute_correlation<T: AsRef<str>>(
    keywords: &[String],
    titles: &[T],
) -> Option<CorrelationMatrix> {
    if keywords.len() < 2 || titles.is_empty() {
        return None;
    }

    let matrix = presence_matrix(keywords, titles);
    let columns: Vec<Vec<f64>> = (0..keywords.len())
        .map(|i| centered(&column(&matrix, i)))
        .collect();

    let n = keywords.len();
    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        let has_variance = columns[i].iter().any(|v| *v != 0.0);
        values[i][i] = if has_variance { 1.0 } else { 0.0 };
        for j in (i + 1)..n {
            let r = pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Some(CorrelationMatrix {
        keywords: keywords.to_vec(),
        values,
    })
}
