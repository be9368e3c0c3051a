use image::{DynamicImage, RgbImage};
use menu::merge::{self, DEFAULT_PROXIMITY_THRESHOLD};
use menu::{
    BoundingBox, Detection, ExtractError, MenuExtractor, Record, TextDetector, output, segment,
};
use ocr::OcrResult;
use std::fs;

/// Replays a fixed detection list, whatever the image.
struct Replay {
    detections: Vec<Detection>,
    calls: usize,
}

impl Replay {
    fn new(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            calls: 0,
        }
    }
}

impl TextDetector for Replay {
    fn detect_image(&mut self, _image: &DynamicImage) -> OcrResult<Vec<Detection>> {
        self.calls += 1;
        Ok(self.detections.clone())
    }
}

fn det(text: &str, x: f32, y: f32, width: f32) -> Detection {
    Detection::from_box(BoundingBox::from_rect(x, y, width, 24.0), text).with_confidence(0.9)
}

fn cafe_latte() -> Vec<Detection> {
    vec![
        det("Café", 10.0, 10.0, 60.0),
        det("Latte", 78.0, 12.0, 70.0),
        det("3,50", 400.0, 10.0, 50.0),
    ]
}

#[test]
fn cafe_latte_end_to_end() {
    let spans = merge::merge(&cafe_latte(), DEFAULT_PROXIMITY_THRESHOLD);
    let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, ["Café Latte", "3,50"]);

    assert_eq!(
        segment::segment(&spans),
        vec![Record::priced("Café Latte", "3,50")]
    );
}

#[test]
fn full_menu_page() {
    let detections = vec![
        det("CARTA", 200.0, 0.0, 120.0),
        det("Tortilla", 10.0, 60.0, 90.0),
        det("española", 105.0, 60.0, 100.0),
        det("4,50€", 400.0, 60.0, 60.0),
        det("Croquetas", 10.0, 100.0, 110.0),
        det("(6 uds.)", 128.0, 100.0, 80.0),
        det("6.00", 400.0, 100.0, 50.0),
        det("Pan y alioli", 10.0, 140.0, 130.0),
        det("Consultar", 400.0, 140.0, 100.0),
        det("Menú del día", 10.0, 180.0, 150.0),
        det("12", 400.0, 180.0, 30.0),
    ];

    let records = menu::extract_records(&detections, DEFAULT_PROXIMITY_THRESHOLD);

    assert_eq!(
        records,
        vec![
            Record::priced("Tortilla española", "4,50"),
            Record::priced("Croquetas 6 uds", "6.00"),
            Record::priced("Menú del día", "12"),
        ]
    );
}

#[test]
fn extract_path_persists_and_reuses_detector() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("cafe.png");
    let second = dir.path().join("cafe2.jpg");
    RgbImage::new(8, 8).save(&first).unwrap();
    RgbImage::new(8, 8).save(&second).unwrap();

    let mut extractor = MenuExtractor::new(Replay::new(cafe_latte()));

    for image in [&first, &second] {
        let extraction = extractor.extract_path(image).unwrap();
        assert_eq!(extraction.detections.len(), 3);
        assert_eq!(extraction.detections[0].confidence, Some(0.9));

        let written = output::save_records(image, &extraction.records).unwrap();
        let json = fs::read_to_string(written).unwrap();
        assert!(json.contains("\"name\": \"Café Latte\""));
        assert!(json.contains("\"price\": \"3,50\""));
    }

    assert_eq!(extractor.detector_mut().calls, 2);
    assert!(dir.path().join("cafe.json").is_file());
    assert!(dir.path().join("cafe2.json").is_file());
}

#[test]
fn missing_image_is_reported_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.jpg");
    let mut extractor = MenuExtractor::new(Replay::new(cafe_latte()));

    let err = extractor.extract_path(&missing).unwrap_err();
    assert!(matches!(err, ExtractError::Image { ref path, .. } if *path == missing));

    // The detector is still usable afterwards.
    let ok = extractor
        .extract_image(&DynamicImage::new_rgb8(4, 4))
        .unwrap();
    assert_eq!(ok.records.len(), 1);
    assert_eq!(extractor.detector_mut().calls, 1);
}

#[test]
fn image_without_text_yields_empty_records() {
    let mut extractor = MenuExtractor::new(Replay::new(Vec::new()));
    let extraction = extractor
        .extract_image(&DynamicImage::new_rgb8(4, 4))
        .unwrap();
    assert!(extraction.records.is_empty());
}

#[test]
fn grouped_price_is_not_swallowed_by_the_name() {
    let detections = vec![det("Paella", 0.0, 0.0, 50.0), det("1.234,50", 60.0, 0.0, 60.0)];
    assert_eq!(
        menu::extract_records(&detections, DEFAULT_PROXIMITY_THRESHOLD),
        vec![Record::priced("Paella", "123450")]
    );
}

#[test]
fn dash_between_words_keeps_the_full_name() {
    let detections = vec![
        det("Pan", 0.0, 0.0, 30.0),
        det("-", 35.0, 0.0, 5.0),
        det("tostado", 55.0, 0.0, 60.0),
        det("2,00", 300.0, 0.0, 40.0),
    ];
    assert_eq!(
        menu::extract_records(&detections, DEFAULT_PROXIMITY_THRESHOLD),
        vec![Record::priced("Pan tostado", "2,00")]
    );
}
