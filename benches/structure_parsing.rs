//! Benchmarks for the text-level hot paths.
//!
//! ```bash
//! cargo bench --bench structure_parsing
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kriti_oxide::fonts::LegacyGlyphDecoder;
use kriti_oxide::structure::StructureParser;
use kriti_oxide::text::{detect_script, normalize};

const KRITI: &str = "Pallavi\nakhilandesvari raksha mam agama sampradaya nipune sri\n\n\
Anupallavi\nnikhila loka nityatmike vimale nirmale syamale sakala kale\n\n\
Charanam\nlambodara guruguha pujite lambalakodbhasite hasite\n\
vagdevataradhite varade vara sailaraja nuta sarade\n\n\
Madhyama Kala Sahityam\njambhari sambhavite janardana nute dvijavanti raga nute\n\n\
Meaning\nO mother of the universe, protect me.";

const MANGLED: &str = "r¯aga ˙m: juj¯avanti (28) — t¯al.a ˙m: ¯adi\n\
akhil¯an.d.e´svari raks.a m¯am ¯agama sampr¯ad¯aya nipun.e ´sr¯ı\n\
nikhila loka nity¯atmike vimale nirmale ´sy¯amale sakala kale";

fn mixed_script(repeats: usize) -> String {
    let mut text = String::new();
    for i in 0..repeats {
        text.push_str(&format!(
            "Charanam {}\nअखिलाण्डेश्वरि रक्ष माम्\nakhilandesvari raksha mam\n",
            i + 1
        ));
    }
    text
}

fn bench_structure_parser(c: &mut Criterion) {
    let parser = StructureParser::new();
    c.bench_function("parse_kriti", |b| b.iter(|| parser.parse(black_box(KRITI))));

    let mut group = c.benchmark_group("parse_mixed_script");
    for repeats in [4usize, 16, 64] {
        let text = mixed_script(repeats);
        group.bench_with_input(BenchmarkId::from_parameter(repeats), &text, |b, text| {
            b.iter(|| parser.parse(black_box(text)))
        });
    }
    group.finish();
}

fn bench_normalizer(c: &mut Criterion) {
    c.bench_function("normalize_mangled", |b| b.iter(|| normalize(black_box(MANGLED))));
    c.bench_function("normalize_clean", |b| b.iter(|| normalize(black_box(KRITI))));
}

fn bench_legacy_decoder(c: &mut Criterion) {
    let decoder = LegacyGlyphDecoder::new();
    let raw = "rAg\\ crZm^ aAEd mAm^ E\u{06}t r\"".repeat(16);
    c.bench_function("decode_legacy_glyphs", |b| b.iter(|| decoder.decode(black_box(&raw))));
}

fn bench_script_detection(c: &mut Criterion) {
    let text = mixed_script(32);
    c.bench_function("detect_script", |b| b.iter(|| detect_script(black_box(&text))));
}

criterion_group!(
    benches,
    bench_structure_parser,
    bench_normalizer,
    bench_legacy_decoder,
    bench_script_detection
);
criterion_main!(benches);
