//! End-to-end runs through the argument parser with a config file

use clap::Parser;
use std::fs;
use std::path::Path;
use toolgrid_cli::{run, Cli};

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("toolgrid.toml");
    fs::write(&path, body).unwrap();
    path
}

fn tiny_png() -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        3,
        3,
        image::Rgba([10, 20, 30, 255]),
    ))
    .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
    .unwrap();
    bytes
}

#[test]
fn convert_image_uses_configured_format_and_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let config = write_config(
        dir.path(),
        &format!("[output]\ndir = {:?}\n\n[image]\nformat = \"png\"\n", out),
    );
    let input = dir.path().join("photo.bmp");
    fs::write(&input, {
        let png = tiny_png();
        let img = image::load_from_memory(&png).unwrap();
        let mut bmp = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bmp), image::ImageFormat::Bmp)
            .unwrap();
        bmp
    })
    .unwrap();

    let cli = Cli::try_parse_from([
        "toolgrid",
        "--config",
        config.to_str().unwrap(),
        "convert-image",
        input.to_str().unwrap(),
    ])
    .unwrap();
    run(cli).unwrap();

    let converted = fs::read(out.join("photo.png")).unwrap();
    assert_eq!(
        image::guess_format(&converted).unwrap(),
        image::ImageFormat::Png
    );
}

#[test]
fn convert_image_reports_failure_after_writing_successes() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &format!("[output]\ndir = {:?}\n", dir.path()));
    let good = dir.path().join("good.png");
    let bad = dir.path().join("bad.png");
    fs::write(&good, tiny_png()).unwrap();
    fs::write(&bad, b"nope").unwrap();

    let cli = Cli::try_parse_from([
        "toolgrid",
        "--config",
        config.to_str().unwrap(),
        "convert-image",
        "--format",
        "jpg",
        bad.to_str().unwrap(),
        good.to_str().unwrap(),
    ])
    .unwrap();

    assert!(run(cli).is_err());
    assert!(dir.path().join("good.jpeg").exists());
}

#[test]
fn currency_overrides_apply() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[currency.rates]\nEUR = 0.5\n");

    let cli = Cli::try_parse_from([
        "toolgrid",
        "--config",
        config.to_str().unwrap(),
        "--json",
        "convert-currency",
        "10",
        "USD",
        "EUR",
    ])
    .unwrap();
    run(cli).unwrap();
}

#[test]
fn broken_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[image]\nquality = 9\n");

    let cli = Cli::try_parse_from([
        "toolgrid",
        "--config",
        config.to_str().unwrap(),
        "units",
    ])
    .unwrap();
    let err = run(cli).unwrap_err();
    assert!(format!("{:#}", err).contains("toolgrid.toml"));
}

#[test]
fn qr_lands_in_configured_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let config = write_config(dir.path(), &format!("[output]\ndir = {:?}\n", out));

    let cli = Cli::try_parse_from([
        "toolgrid",
        "--config",
        config.to_str().unwrap(),
        "qr",
        "hello",
    ])
    .unwrap();
    run(cli).unwrap();

    let svg = fs::read_to_string(out.join("qr.svg")).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn password_without_character_classes_fails() {
    let cli = Cli::try_parse_from([
        "toolgrid",
        "password",
        "--no-uppercase",
        "--no-lowercase",
        "--no-numbers",
    ])
    .unwrap();
    assert!(run(cli).is_err());
}
