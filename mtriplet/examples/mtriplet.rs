use std::{fs, path::Path};

use fpr_core::Minutia;
use mtriplet::TripletExtractor;

fn replace_ext(filename: &str, new: &str) -> String {
    let stemmed = Path::new(filename).file_stem().unwrap().to_str().unwrap();
    format!("{stemmed}{new}")
}

/// Reads a minutia list from a CSV of `x, y, direction` rows.
fn read_minutiae(path: &str) -> Vec<Minutia> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields: Vec<f64> = line
                .split(',')
                .map(|field| field.trim().parse().unwrap())
                .collect();
            Minutia::new(fields[0], fields[1], fields[2])
        })
        .collect()
}

fn main() {
    pretty_env_logger::init_timed();
    let args: Vec<_> = std::env::args().collect();
    for path in &args[1..] {
        let minutiae = read_minutiae(path);
        let feature = TripletExtractor::new().extract(minutiae);
        let mut out = fs::File::create(replace_ext(path, "_triplets.csv")).unwrap();
        for triplet in feature.triplets() {
            let [a, b, c] = triplet.minutia_indices();
            let [s0, s1, s2] = triplet.sides();
            let [r0, r1, r2] = triplet.relative_directions();
            std::io::Write::write_all(
                &mut out,
                format!("{a}, {b}, {c}, {s0}, {s1}, {s2}, {r0}, {r1}, {r2}\n").as_bytes(),
            )
            .unwrap();
        }
        println!(
            "{}: {} minutiae, {} triplets",
            path,
            feature.minutiae().len(),
            feature.triplets().len()
        );
    }
}
