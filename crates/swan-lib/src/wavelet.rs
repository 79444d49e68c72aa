use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Supported orthonormal wavelet families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveletFamily {
    Haar,
    Daubechies,
    Symlet,
}

/// An orthonormal analysis filter pair.
///
/// Only the decomposition filters are stored; the periodized synthesis step
/// is the exact adjoint of the analysis operator, so the same pair drives
/// both directions.
#[derive(Debug, Clone)]
pub struct Wavelet {
    family: WaveletFamily,
    order: usize,
    dec_lo: Vec<f64>,
    dec_hi: Vec<f64>,
}

impl Wavelet {
    /// Look up a wavelet by family tag and order: `"haar"` (order 1),
    /// `"db"` (1-10) or `"sym"` (2-8).
    pub fn new(family: &str, order: usize) -> Result<Self, AnalysisError> {
        let tag = family.trim().to_ascii_lowercase();
        let (family, dec_lo): (WaveletFamily, &[f64]) = match tag.as_str() {
            "haar" => {
                if order != 1 {
                    return Err(AnalysisError::InvalidParameter(format!(
                        "haar has a single order (1), got {order}"
                    )));
                }
                (WaveletFamily::Haar, &DB1)
            }
            "db" => (WaveletFamily::Daubechies, daubechies_filter(order)?),
            "sym" => (WaveletFamily::Symlet, symlet_filter(order)?),
            other => {
                return Err(AnalysisError::InvalidParameter(format!(
                    "unknown wavelet family {other:?}; supported: haar, db (1-10), sym (2-8)"
                )))
            }
        };
        let dec_hi = quadrature_mirror(dec_lo);
        Ok(Self {
            family,
            order,
            dec_lo: dec_lo.to_vec(),
            dec_hi,
        })
    }

    pub fn family(&self) -> WaveletFamily {
        self.family
    }
    pub fn order(&self) -> usize {
        self.order
    }
    pub fn filter_len(&self) -> usize {
        self.dec_lo.len()
    }
    pub fn dec_lo(&self) -> &[f64] {
        &self.dec_lo
    }
    pub fn dec_hi(&self) -> &[f64] {
        &self.dec_hi
    }

    /// Short name such as `"db4"` or `"haar"`.
    pub fn name(&self) -> String {
        match self.family {
            WaveletFamily::Haar => "haar".to_string(),
            WaveletFamily::Daubechies => format!("db{}", self.order),
            WaveletFamily::Symlet => format!("sym{}", self.order),
        }
    }

    /// Maximum useful decomposition depth for a record of `signal_len`
    /// samples: floor(log2(signal_len / (filter_len - 1))).
    pub fn max_level(&self, signal_len: usize) -> usize {
        let span = self.dec_lo.len() - 1;
        if signal_len < span {
            return 0;
        }
        let mut ratio = signal_len / span;
        let mut level = 0;
        while ratio >= 2 {
            ratio /= 2;
            level += 1;
        }
        level
    }

    /// One analysis step: approximation and detail coefficients, each of
    /// length ceil(n / 2). Odd-length input is extended by repeating the
    /// final sample before the periodized transform.
    pub fn decompose(&self, data: &[f64]) -> Result<(Vec<f64>, Vec<f64>), AnalysisError> {
        let even = pad_to_even(data);
        if even.len() < self.dec_lo.len() {
            return Err(AnalysisError::InsufficientData(format!(
                "{} samples are too few for the {}-tap {} filter",
                data.len(),
                self.dec_lo.len(),
                self.name()
            )));
        }
        let approx = analyze(&even, &self.dec_lo);
        let detail = analyze(&even, &self.dec_hi);
        Ok((approx, detail))
    }

    /// Exact inverse of [`Wavelet::decompose`] for an output of `out_len`
    /// samples.
    pub fn reconstruct(
        &self,
        approx: &[f64],
        detail: &[f64],
        out_len: usize,
    ) -> Result<Vec<f64>, AnalysisError> {
        let even_len = out_len + out_len % 2;
        if approx.len() != even_len / 2 || detail.len() != even_len / 2 {
            return Err(AnalysisError::InvalidParameter(format!(
                "coefficient lengths {} and {} do not match an output of {} samples",
                approx.len(),
                detail.len(),
                out_len
            )));
        }
        if even_len < self.dec_lo.len() {
            return Err(AnalysisError::InsufficientData(format!(
                "{out_len} samples are too few for the {}-tap {} filter",
                self.dec_lo.len(),
                self.name()
            )));
        }
        let mut out = synthesize(approx, detail, &self.dec_lo, &self.dec_hi, even_len);
        out.truncate(out_len);
        Ok(out)
    }

    /// Cascade [`Wavelet::decompose`] to the requested depth.
    ///
    /// The detail bands are stored finest first: `details[0]` holds the
    /// level-1 coefficients.
    pub fn wavedec(
        &self,
        data: &[f64],
        level: usize,
    ) -> Result<WaveletDecomposition, AnalysisError> {
        if level == 0 {
            return Err(AnalysisError::InvalidParameter(
                "decomposition level must be at least 1".into(),
            ));
        }
        let max = self.max_level(data.len());
        if level > max {
            return Err(AnalysisError::InvalidParameter(format!(
                "level {} exceeds the maximum of {} for {} samples with {}",
                level,
                max,
                data.len(),
                self.name()
            )));
        }

        let mut lengths = Vec::with_capacity(level);
        let mut details = Vec::with_capacity(level);
        let mut current = data.to_vec();
        for _ in 0..level {
            lengths.push(current.len());
            if current.len() % 2 == 1 {
                let last = current[current.len() - 1];
                current.push(last);
            }
            let detail = analyze(&current, &self.dec_hi);
            let approx = analyze(&current, &self.dec_lo);
            details.push(detail);
            current = approx;
        }
        Ok(WaveletDecomposition {
            wavelet: self.clone(),
            approx: current,
            details,
            lengths,
        })
    }
}

/// Multi-level decomposition of one record.
///
/// `approx` holds the coarsest approximation; `details` run from the finest
/// band (level 1) to the coarsest. The recorded per-level lengths make the
/// inverse cascade exact for any input length.
#[derive(Debug, Clone)]
pub struct WaveletDecomposition {
    wavelet: Wavelet,
    pub approx: Vec<f64>,
    pub details: Vec<Vec<f64>>,
    lengths: Vec<usize>,
}

impl WaveletDecomposition {
    pub fn wavelet(&self) -> &Wavelet {
        &self.wavelet
    }
    pub fn level(&self) -> usize {
        self.details.len()
    }

    /// Inverse cascade back to the original sample count.
    pub fn reconstruct(&self) -> Vec<f64> {
        let mut current = self.approx.clone();
        for lvl in (0..self.details.len()).rev() {
            let target = self.lengths[lvl];
            let even_len = target + target % 2;
            current = synthesize(
                &current,
                &self.details[lvl],
                &self.wavelet.dec_lo,
                &self.wavelet.dec_hi,
                even_len,
            );
            current.truncate(target);
        }
        current
    }
}

/// Alternating flip of the reversed lowpass filter; together the pair spans
/// an orthonormal basis under even shifts.
fn quadrature_mirror(dec_lo: &[f64]) -> Vec<f64> {
    dec_lo
        .iter()
        .rev()
        .enumerate()
        .map(|(k, &v)| if k % 2 == 0 { -v } else { v })
        .collect()
}

fn pad_to_even(data: &[f64]) -> Vec<f64> {
    let mut out = data.to_vec();
    if out.len() % 2 == 1 {
        let last = out[out.len() - 1];
        out.push(last);
    }
    out
}

/// Correlate `even` (length n, n even, n >= filter length) with the filter
/// at every second offset, wrapping indices mod n.
fn analyze(even: &[f64], filter: &[f64]) -> Vec<f64> {
    let n = even.len();
    debug_assert!(n % 2 == 0 && filter.len() <= n);
    let mut out = Vec::with_capacity(n / 2);
    for i in 0..n / 2 {
        let mut acc = 0.0;
        for (k, &c) in filter.iter().enumerate() {
            let mut idx = 2 * i + k;
            if idx >= n {
                idx -= n;
            }
            acc += c * even[idx];
        }
        out.push(acc);
    }
    out
}

/// Adjoint of [`analyze`]: scatter each coefficient back through the filter
/// taps. With orthonormal filters this is the exact inverse.
fn synthesize(approx: &[f64], detail: &[f64], lo: &[f64], hi: &[f64], n: usize) -> Vec<f64> {
    debug_assert!(n % 2 == 0 && lo.len() <= n);
    let mut out = vec![0.0; n];
    for (i, (&a, &d)) in approx.iter().zip(detail).take(n / 2).enumerate() {
        for (k, (&l, &h)) in lo.iter().zip(hi).enumerate() {
            let mut idx = 2 * i + k;
            if idx >= n {
                idx -= n;
            }
            out[idx] += a * l + d * h;
        }
    }
    out
}

fn daubechies_filter(order: usize) -> Result<&'static [f64], AnalysisError> {
    let filter: &[f64] = match order {
        1 => &DB1,
        2 => &DB2,
        3 => &DB3,
        4 => &DB4,
        5 => &DB5,
        6 => &DB6,
        7 => &DB7,
        8 => &DB8,
        9 => &DB9,
        10 => &DB10,
        _ => {
            return Err(AnalysisError::InvalidParameter(format!(
                "db order {order} is unsupported (expected 1-10)"
            )))
        }
    };
    Ok(filter)
}

fn symlet_filter(order: usize) -> Result<&'static [f64], AnalysisError> {
    let filter: &[f64] = match order {
        // sym2 and sym3 coincide with their Daubechies counterparts.
        2 => &DB2,
        3 => &DB3,
        4 => &SYM4,
        5 => &SYM5,
        6 => &SYM6,
        7 => &SYM7,
        8 => &SYM8,
        _ => {
            return Err(AnalysisError::InvalidParameter(format!(
                "sym order {order} is unsupported (expected 2-8)"
            )))
        }
    };
    Ok(filter)
}

// Decomposition lowpass coefficients of the standard orthonormal families.
static DB1: [f64; 2] = [0.7071067811865476, 0.7071067811865476];

static DB2: [f64; 4] = [
    -0.12940952255092145,
    0.22414386804185735,
    0.8365163037378079,
    0.48296291314469025,
];

static DB3: [f64; 6] = [
    0.035226291882100656,
    -0.08544127388224149,
    -0.13501102001039084,
    0.4598775021193313,
    0.8068915093133388,
    0.3326705529509569,
];

static DB4: [f64; 8] = [
    -0.010597401784997278,
    0.032883011666982945,
    0.030841381835986965,
    -0.18703481171888114,
    -0.02798376941698385,
    0.6308807679295904,
    0.7148465705525415,
    0.23037781330885523,
];

static DB5: [f64; 10] = [
    0.003335725285001549,
    -0.012580751999015526,
    -0.006241490213011705,
    0.07757149384006515,
    -0.03224486958502952,
    -0.24229488706619015,
    0.13842814590110342,
    0.7243085284385744,
    0.6038292697974729,
    0.160102397974125,
];

static DB6: [f64; 12] = [
    -0.00107730108499558,
    0.004777257511010651,
    0.0005538422009938016,
    -0.031582039318031156,
    0.02752286553001629,
    0.09750160558707936,
    -0.12976686756709563,
    -0.22626469396516913,
    0.3152503517092432,
    0.7511339080215775,
    0.4946238903983854,
    0.11154074335008017,
];

static DB7: [f64; 14] = [
    0.0003537138000010399,
    -0.0018016407039998328,
    0.00042957797300470274,
    0.012550998556013784,
    -0.01657454163101562,
    -0.03802993693503463,
    0.08061260915107307,
    0.07130921926705004,
    -0.22403618499416572,
    -0.14390600392910627,
    0.4697822874053586,
    0.7291320908465551,
    0.39653931948230575,
    0.07785205408506236,
];

static DB8: [f64; 16] = [
    -0.00011747678400228192,
    0.0006754494059985568,
    -0.0003917403729959771,
    -0.00487035299301066,
    0.008746094047015655,
    0.013981027917015516,
    -0.04408825393106472,
    -0.01736930100202211,
    0.128747426620186,
    0.00047248457399797254,
    -0.2840155429624281,
    -0.015829105256023893,
    0.5853546836548691,
    0.6756307362980128,
    0.3128715909144659,
    0.05441584224308161,
];

static DB9: [f64; 18] = [
    3.9347319995026124e-05,
    -0.0002519631889981789,
    0.00023038576399541288,
    0.0018476468829611268,
    -0.004281503681904723,
    -0.004723204757894831,
    0.022361662123515244,
    0.00025094711499193845,
    -0.06763282905952399,
    0.030725681478322865,
    0.14854074933476008,
    -0.09684078322087904,
    -0.29327378327258685,
    0.13319738582208895,
    0.6572880780366389,
    0.6048231236767786,
    0.24383467463766728,
    0.03807794736316728,
];

static DB10: [f64; 20] = [
    -1.326420300235487e-05,
    9.358867000108985e-05,
    -0.0001164668549943862,
    -0.0006858566950046825,
    0.00199240529499085,
    0.0013953517469940798,
    -0.010733175482979604,
    0.0036065535669883944,
    0.03321267405893324,
    -0.02945753682194567,
    -0.07139414716586077,
    0.09305736460380659,
    0.12736934033574265,
    -0.19594627437659665,
    -0.24984642432648865,
    0.2811723436604265,
    0.6884590394525921,
    0.5272011889309198,
    0.18817680007762133,
    0.026670057900950818,
];

static SYM4: [f64; 8] = [
    -0.07576571478927333,
    -0.02963552764599851,
    0.49761866763201545,
    0.8037387518059161,
    0.29785779560527736,
    -0.09921954357684722,
    -0.012603967262037833,
    0.0322231006040427,
];

static SYM5: [f64; 10] = [
    0.027333068345077982,
    0.029519490925774643,
    -0.039134249302383094,
    0.1993975339773936,
    0.7234076904024206,
    0.6339789634582119,
    0.01660210576452232,
    -0.17532808990845047,
    -0.021101834024758855,
    0.019538882735286728,
];

static SYM6: [f64; 12] = [
    0.015404109327027373,
    0.0034907120842174702,
    -0.11799011114819057,
    -0.048311742585633,
    0.4910559419267466,
    0.787641141030194,
    0.3379294217276218,
    -0.07263752278646252,
    -0.021060292512300564,
    0.04472490177066578,
    0.0017677118642428036,
    -0.007800708325034148,
];

static SYM7: [f64; 14] = [
    0.002681814568257878,
    -0.0010473848886829163,
    -0.01263630340325193,
    0.03051551316596357,
    0.0678926935013727,
    -0.049552834937127255,
    0.017441255086855827,
    0.5361019170917628,
    0.767764317003164,
    0.2886296317515146,
    -0.14004724044296152,
    -0.10780823770381774,
    0.004010244871533663,
    0.010268176708511255,
];

static SYM8: [f64; 16] = [
    -0.0033824159510061256,
    -0.0005421323317911481,
    0.03169508781149298,
    0.007607487324917605,
    -0.1432942383508097,
    -0.061273359067658524,
    0.4813596512583722,
    0.7771857517005235,
    0.3644418948353314,
    -0.05194583810770904,
    -0.027219029917056003,
    0.049137179673607506,
    0.003808752013890615,
    -0.01495225833704823,
    -0.0003029205147213668,
    0.0018899503327594609,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, SQRT_2};

    fn all_wavelets() -> Vec<Wavelet> {
        let mut out = vec![Wavelet::new("haar", 1).unwrap()];
        for order in 1..=10 {
            out.push(Wavelet::new("db", order).unwrap());
        }
        for order in 2..=8 {
            out.push(Wavelet::new("sym", order).unwrap());
        }
        out
    }

    fn test_signal(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                let mut v = (2.0 * PI * 3.0 * t).sin() + 0.4 * (2.0 * PI * 17.0 * t).cos();
                if i == n / 3 {
                    v += 1.5;
                }
                v
            })
            .collect()
    }

    #[test]
    fn filters_are_orthonormal() {
        for w in all_wavelets() {
            let lo = w.dec_lo();
            let sum: f64 = lo.iter().sum();
            assert!(
                (sum - SQRT_2).abs() < 1e-8,
                "{}: lowpass sum {sum}",
                w.name()
            );
            let energy: f64 = lo.iter().map(|c| c * c).sum();
            assert!(
                (energy - 1.0).abs() < 1e-8,
                "{}: lowpass energy {energy}",
                w.name()
            );
            for shift in 1..lo.len() / 2 {
                let dot: f64 = lo
                    .iter()
                    .zip(lo.iter().skip(2 * shift))
                    .map(|(a, b)| a * b)
                    .sum();
                assert!(
                    dot.abs() < 1e-8,
                    "{}: self-correlation at shift {shift} is {dot}",
                    w.name()
                );
            }
            let hi_sum: f64 = w.dec_hi().iter().sum();
            assert!(hi_sum.abs() < 1e-8, "{}: highpass sum {hi_sum}", w.name());
        }
    }

    #[test]
    fn round_trip_is_exact_for_every_family() {
        for w in all_wavelets() {
            for &n in &[96usize, 97] {
                let x = test_signal(n);
                let decomp = w.wavedec(&x, 2).unwrap();
                let back = decomp.reconstruct();
                assert_eq!(back.len(), n);
                for (a, b) in x.iter().zip(&back) {
                    assert!(
                        (a - b).abs() < 1e-8,
                        "{} at n={n}: {a} vs {b}",
                        w.name()
                    );
                }
            }
        }
    }

    #[test]
    fn deep_round_trip_matches_input() {
        let w = Wavelet::new("db", 4).unwrap();
        let x = test_signal(2048);
        let decomp = w.wavedec(&x, 8).unwrap();
        assert_eq!(decomp.level(), 8);
        let back = decomp.reconstruct();
        for (a, b) in x.iter().zip(&back) {
            assert!((a - b).abs() < 1e-8);
        }
    }

    #[test]
    fn transform_preserves_energy() {
        let w = Wavelet::new("db", 6).unwrap();
        let x = test_signal(64);
        let (approx, detail) = w.decompose(&x).unwrap();
        let input: f64 = x.iter().map(|v| v * v).sum();
        let output: f64 = approx.iter().chain(&detail).map(|v| v * v).sum();
        assert!((input - output).abs() < 1e-8);
    }

    #[test]
    fn single_level_lengths_are_half_rounded_up() {
        let w = Wavelet::new("db", 2).unwrap();
        let (a, d) = w.decompose(&test_signal(10)).unwrap();
        assert_eq!((a.len(), d.len()), (5, 5));
        let (a, d) = w.decompose(&test_signal(11)).unwrap();
        assert_eq!((a.len(), d.len()), (6, 6));
    }

    #[test]
    fn reconstruct_inverts_decompose() {
        let w = Wavelet::new("sym", 4).unwrap();
        let x = test_signal(41);
        let (a, d) = w.decompose(&x).unwrap();
        let back = w.reconstruct(&a, &d, x.len()).unwrap();
        assert_eq!(back.len(), 41);
        for (p, q) in x.iter().zip(&back) {
            assert!((p - q).abs() < 1e-8);
        }
    }

    #[test]
    fn max_level_worked_examples() {
        let db4 = Wavelet::new("db", 4).unwrap();
        assert_eq!(db4.max_level(187), 4);
        assert_eq!(db4.max_level(5000), 9);
        let haar = Wavelet::new("haar", 1).unwrap();
        assert_eq!(haar.max_level(1), 0);
        assert_eq!(haar.max_level(2), 1);
    }

    #[test]
    fn rejects_unknown_families_and_orders() {
        for (family, order) in [("coif", 1), ("db", 0), ("db", 11), ("sym", 1), ("haar", 2)] {
            assert!(
                matches!(
                    Wavelet::new(family, order),
                    Err(AnalysisError::InvalidParameter(_))
                ),
                "{family}{order} should be rejected"
            );
        }
    }

    #[test]
    fn wavedec_rejects_out_of_range_levels() {
        let w = Wavelet::new("db", 4).unwrap();
        let x = test_signal(187);
        assert!(matches!(
            w.wavedec(&x, 0),
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(matches!(
            w.wavedec(&x, 5),
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(w.wavedec(&x, 4).is_ok());
    }

    #[test]
    fn decompose_rejects_records_shorter_than_the_filter() {
        let w = Wavelet::new("db", 8).unwrap();
        assert!(matches!(
            w.decompose(&[1.0; 10]),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn reconstruct_checks_coefficient_lengths() {
        let w = Wavelet::new("haar", 1).unwrap();
        let err = w.reconstruct(&[1.0, 2.0], &[0.0], 4);
        assert!(matches!(err, Err(AnalysisError::InvalidParameter(_))));
    }

    #[test]
    fn names_round_trip_family_and_order() {
        assert_eq!(Wavelet::new("db", 4).unwrap().name(), "db4");
        assert_eq!(Wavelet::new("sym", 8).unwrap().name(), "sym8");
        assert_eq!(Wavelet::new("haar", 1).unwrap().name(), "haar");
        assert_eq!(Wavelet::new("db", 10).unwrap().filter_len(), 20);
    }
}
