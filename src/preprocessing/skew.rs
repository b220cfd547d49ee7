//! Коррекция асимметрии распределений
//!
//! Признаки с |асимметрией| выше порога исправляются: сильно положительные
//! сначала через log(1+x), затем все — степенным преобразованием
//! Йео-Джонсона (в отличие от Бокса-Кокса оно определено для нулевых и
//! отрицательных значений). Сбой на одном признаке не прерывает остальные.

use ndarray::{Array1, ArrayView1};

use crate::preprocessing::table::FeatureTable;

/// Канонический порог |асимметрии|
pub const DEFAULT_SKEW_THRESHOLD: f64 = 1.0;

/// Диапазон перебора лямбды Йео-Джонсона
const LAMBDA_RANGE: (f64, f64) = (-5.0, 5.0);

/// Асимметрия каждой колонки признаков, пересчитывается на каждый запуск
#[derive(Debug, Clone)]
pub struct SkewProfile {
    skewness: Vec<f64>,
}

impl SkewProfile {
    pub fn compute(table: &FeatureTable) -> Self {
        let skewness = (0..table.n_features())
            .map(|j| column_skewness(table.features().column(j)))
            .collect();
        Self { skewness }
    }

    pub fn skewness(&self) -> &[f64] {
        &self.skewness
    }
}

/// Признак, оставленный без преобразования, и причина
#[derive(Debug, Clone)]
pub struct FeatureDiagnostic {
    /// Индекс признака с единицы, как в исходном формате
    pub feature: usize,
    pub reason: String,
}

/// Итог прохода коррекции: какие признаки преобразованы, какие пропущены
#[derive(Debug, Clone, Default)]
pub struct SkewReport {
    pub transformed: Vec<usize>,
    pub skipped: Vec<FeatureDiagnostic>,
}

pub struct SkewCorrector {
    threshold: f64,
}

impl SkewCorrector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Правит перекошенные колонки на месте. Целевая колонка таблицы не
    /// затрагивается. Число и порядок строк сохраняются.
    pub fn correct(&self, table: &mut FeatureTable) -> SkewReport {
        let profile = SkewProfile::compute(table);
        let mut report = SkewReport::default();

        for (j, &skew) in profile.skewness().iter().enumerate() {
            if skew.abs() <= self.threshold {
                continue;
            }

            let column = table.features().column(j).to_owned();
            match transform_column(&column, skew, self.threshold) {
                Ok(corrected) => {
                    table.features_mut().column_mut(j).assign(&corrected);
                    report.transformed.push(j + 1);
                }
                Err(reason) => {
                    tracing::warn!(
                        "Skipping skew correction for feature_{}: {}",
                        j + 1,
                        reason
                    );
                    report.skipped.push(FeatureDiagnostic {
                        feature: j + 1,
                        reason,
                    });
                }
            }
        }

        report
    }
}

/// log1p (для сильно положительной асимметрии), затем Йео-Джонсон с
/// подобранной лямбдой. Ошибка оставляет колонку как есть.
fn transform_column(
    column: &Array1<f64>,
    skew: f64,
    threshold: f64,
) -> Result<Array1<f64>, String> {
    let mut data = column.clone();

    if skew > threshold {
        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        // log1p определен только при x > -1
        if min > -1.0 {
            data.mapv_inplace(f64::ln_1p);
        }
    }

    let lambda = fit_lambda(&data)?;
    Ok(data.mapv(|x| yeo_johnson(x, lambda)))
}

/// Преобразование Йео-Джонсона одного значения
fn yeo_johnson(x: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        if lambda.abs() < 1e-12 {
            (x + 1.0).ln()
        } else {
            ((x + 1.0).powf(lambda) - 1.0) / lambda
        }
    } else if (lambda - 2.0).abs() < 1e-12 {
        -(-x + 1.0).ln()
    } else {
        -((-x + 1.0).powf(2.0 - lambda) - 1.0) / (2.0 - lambda)
    }
}

/// Подбор лямбды максимизацией логарифма правдоподобия методом золотого
/// сечения. Детерминирован: без случайных стартовых точек.
fn fit_lambda(data: &Array1<f64>) -> Result<f64, String> {
    const INVPHI: f64 = 0.618_033_988_749_894_8;

    let (mut a, mut b) = LAMBDA_RANGE;
    let mut c = b - INVPHI * (b - a);
    let mut d = a + INVPHI * (b - a);
    let mut fc = log_likelihood(data, c);
    let mut fd = log_likelihood(data, d);

    for _ in 0..100 {
        if fc > fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INVPHI * (b - a);
            fc = log_likelihood(data, c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INVPHI * (b - a);
            fd = log_likelihood(data, d);
        }
        if (b - a).abs() < 1e-8 {
            break;
        }
    }

    let lambda = 0.5 * (a + b);
    if log_likelihood(data, lambda).is_finite() {
        Ok(lambda)
    } else {
        Err("non-finite Yeo-Johnson log-likelihood".to_string())
    }
}

fn log_likelihood(data: &Array1<f64>, lambda: f64) -> f64 {
    let n = data.len() as f64;
    if n == 0.0 {
        return f64::NEG_INFINITY;
    }

    let transformed = data.mapv(|x| yeo_johnson(x, lambda));
    let mean = transformed.sum() / n;
    let variance = transformed.mapv(|y| (y - mean) * (y - mean)).sum() / n;
    if !variance.is_finite() || variance <= 0.0 {
        return f64::NEG_INFINITY;
    }

    let jacobian: f64 = data
        .iter()
        .map(|&x| x.signum() * (x.abs() + 1.0).ln())
        .sum();
    -0.5 * n * variance.ln() + (lambda - 1.0) * jacobian
}

/// Популяционная асимметрия (m3/n)/sigma^3; ноль для вырожденных колонок
fn column_skewness(column: ArrayView1<f64>) -> f64 {
    let n = column.len() as f64;
    if n == 0.0 {
        return 0.0;
    }

    let mean = column.sum() / n;
    let mut m2 = 0.0;
    let mut m3 = 0.0;
    for &x in column {
        let d = x - mean;
        m2 += d * d;
        m3 += d * d * d;
    }

    let sigma = (m2 / n).sqrt();
    if sigma < 1e-12 {
        return 0.0;
    }
    (m3 / n) / (sigma * sigma * sigma)
}
