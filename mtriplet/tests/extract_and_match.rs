use fpr_core::Minutia;
use image::DynamicImage;
use mtriplet::{
    match_all, Error, MTriplet, MTripletsFeature, MinutiaDetector, SimilarityThresholds,
    TripletExtractor,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

fn random_print(n: usize) -> Vec<Minutia> {
    let mut rng = Pcg64::from_seed([7; 32]);
    (0..n)
        .map(|_| {
            Minutia::new(
                rng.gen_range(0.0..300.0),
                rng.gen_range(0.0..300.0),
                rng.gen_range(-3.1..3.1),
            )
        })
        .collect()
}

/// Rigidly moves a print: rotate by `theta` around the origin, then translate.
fn transformed(minutiae: &[Minutia], theta: f64, dx: f64, dy: f64) -> Vec<Minutia> {
    let (sin, cos) = theta.sin_cos();
    minutiae
        .iter()
        .map(|m| {
            Minutia::new(
                m.position.x * cos - m.position.y * sin + dx,
                m.position.x * sin + m.position.y * cos + dy,
                m.direction + theta,
            )
        })
        .collect()
}

#[test]
fn square_print_yields_two_triplets() {
    let minutiae = vec![
        Minutia::new(0.0, 0.0, 0.3),
        Minutia::new(10.0, 0.0, 1.1),
        Minutia::new(10.0, 10.0, 2.0),
        Minutia::new(0.0, 10.0, -0.5),
    ];
    let feature = TripletExtractor::new().extract(minutiae);
    assert_eq!(feature.triplets().len(), 2);
    assert_eq!(feature.minutiae().len(), 4);
}

#[test]
fn collinear_print_yields_no_triplets_but_keeps_minutiae() {
    let minutiae = vec![
        Minutia::new(0.0, 0.0, 0.3),
        Minutia::new(5.0, 0.0, 1.1),
        Minutia::new(10.0, 0.0, 2.0),
    ];
    let feature = TripletExtractor::new().extract(minutiae);
    assert!(feature.triplets().is_empty());
    assert_eq!(feature.minutiae().len(), 3);
}

#[test]
fn extraction_is_idempotent() {
    let minutiae = random_print(40);
    let extractor = TripletExtractor::new();
    let first = extractor.extract(minutiae.clone());
    let second = extractor.extract(minutiae);

    let keys = |feature: &MTripletsFeature| {
        feature
            .triplets()
            .iter()
            .map(MTriplet::structural_key)
            .collect::<Vec<_>>()
    };
    assert_eq!(keys(&first), keys(&second));
}

#[test]
fn structural_duplicates_collapse() {
    let minutiae = vec![
        Minutia::new(0.0, 0.0, 0.3),
        Minutia::new(30.0, 0.0, 1.1),
        Minutia::new(10.0, 20.0, 2.0),
        Minutia::new(100.0, 100.0, -0.5),
    ];
    // The same triangle listed in every vertex order, plus one genuinely distinct
    // triangle and one degenerate entry.
    let triangles = [
        [0, 1, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
        [0, 1, 3],
        [1, 1, 2],
    ];
    let feature = MTripletsFeature::from_triangles(minutiae, &triangles);
    assert_eq!(feature.triplets().len(), 2);
    // First-seen order is preserved and the slot order is canonical.
    assert_eq!(feature.triplets()[0].minutia_indices(), [2, 0, 1]);
}

#[test]
fn find_similar_is_absent_or_positive_in_storage_order() {
    let query_print = random_print(30);
    let template = TripletExtractor::new().extract(query_print.clone());

    // A query triplet taken from the same print matches at least itself.
    let query = template.triplets()[0];
    let thresholds = SimilarityThresholds::new();
    let candidates = template.find_similar(&query, &thresholds).unwrap();
    assert!(candidates.iter().any(|c| c.template == 0));
    for candidate in &candidates {
        assert!(candidate.score > 0.0);
    }
    // Template-storage order, unsorted by score.
    for pair in candidates.windows(2) {
        assert!(pair[0].template < pair[1].template);
    }

    // A triplet that cannot exist in the template is an explicit absence.
    let far = vec![
        Minutia::new(0.0, 0.0, 0.0),
        Minutia::new(2000.0, 0.0, 1.0),
        Minutia::new(0.0, 2000.0, 2.0),
    ];
    let alien = MTriplet::from_triangle(&far, [0, 1, 2]).unwrap();
    assert!(template.find_similar(&alien, &thresholds).is_none());
}

#[test]
fn rigid_motion_survives_end_to_end() {
    let print = random_print(25);
    let moved = transformed(&print, 0.6, 420.0, -35.0);

    let extractor = TripletExtractor::new();
    let query = extractor.extract(print);
    let template = extractor.extract(moved);

    let pairs = match_all(&query, &template, &SimilarityThresholds::new());
    // Every query triplet should find its rigidly moved counterpart.
    assert!(
        pairs.len() >= query.triplets().len(),
        "only {} pairs for {} query triplets",
        pairs.len(),
        query.triplets().len()
    );
    assert!(pairs.iter().all(|(_, candidate)| candidate.score > 0.0));
}

struct FixedDetector(Vec<Minutia>);

impl MinutiaDetector for FixedDetector {
    fn detect(
        &self,
        _image: &DynamicImage,
    ) -> Result<Vec<Minutia>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0.clone())
    }
}

struct BrokenDetector;

impl MinutiaDetector for BrokenDetector {
    fn detect(
        &self,
        _image: &DynamicImage,
    ) -> Result<Vec<Minutia>, Box<dyn std::error::Error + Send + Sync>> {
        Err("sensor on fire".into())
    }
}

#[test]
fn raster_extraction_without_a_detector_is_a_distinct_error() {
    let image = DynamicImage::new_luma8(32, 32);
    let error = TripletExtractor::new().extract_image(&image).unwrap_err();
    assert!(matches!(error, Error::UnconfiguredDetector));
}

#[test]
fn raster_extraction_uses_the_configured_detector() {
    let image = DynamicImage::new_luma8(32, 32);
    let minutiae = vec![
        Minutia::new(0.0, 0.0, 0.3),
        Minutia::new(10.0, 0.0, 1.1),
        Minutia::new(10.0, 10.0, 2.0),
        Minutia::new(0.0, 10.0, -0.5),
    ];
    let extractor = TripletExtractor::new().with_detector(Box::new(FixedDetector(minutiae)));
    let feature = extractor.extract_image(&image).unwrap();
    assert_eq!(feature.triplets().len(), 2);
}

#[test]
fn detector_failures_are_not_masked() {
    let image = DynamicImage::new_luma8(32, 32);
    let extractor = TripletExtractor::new().with_detector(Box::new(BrokenDetector));
    let error = extractor.extract_image(&image).unwrap_err();
    assert!(matches!(error, Error::Detector(_)));
}
