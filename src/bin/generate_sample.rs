use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Map, Value as JsonValue};

/// Write a synthetic exam results file for trying out the viewer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Output file
    #[arg(default_value = "sample_exams.json")]
    output: PathBuf,

    /// Number of students
    #[arg(short, long, default_value_t = 120)]
    students: usize,

    /// Questions per exam
    #[arg(short, long, default_value_t = 20)]
    questions: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

const OPTIONS: [&str; 5] = ["A", "B", "C", "D", "E"];
const EXAMS: [&str; 3] = ["A", "B", "C"];
const COHORTS: [u32; 5] = [2018, 2019, 2020, 2021, 2022];
const SURNAMES: [&str; 10] = [
    "GARCIA", "LOPEZ", "PEREZ", "DIAZ", "RUIZ", "FLORES", "TORRES", "RAMOS", "CASTRO", "VARGAS",
];
const NAMES: [&str; 8] = ["Ana", "Luis", "Marta", "Jorge", "Lucia", "Diego", "Rosa", "Pablo"];

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    // One answer key per exam variant.
    let keys: Vec<Map<String, JsonValue>> = EXAMS
        .iter()
        .map(|_| {
            (1..=args.questions)
                .map(|q| (format!("Q{q}"), json!(rng.pick(&OPTIONS))))
                .collect()
        })
        .collect();

    // Per-question chance of a correct answer, so difficulty varies.
    let ease: Vec<f64> = (0..args.questions)
        .map(|_| 0.15 + 0.8 * rng.next_f64())
        .collect();

    let mut records = Vec::with_capacity(args.students);
    for i in 0..args.students {
        let exam_idx = rng.below(EXAMS.len());
        let key = &keys[exam_idx];
        let cohort = rng.pick(&COHORTS);
        let ability = 0.6 + 0.8 * rng.next_f64();

        let mut answers = Map::new();
        let mut correct = 0;
        for (q, chance) in ease.iter().enumerate() {
            let qkey = format!("Q{}", q + 1);
            // Roughly 3% of answers are left blank.
            if rng.next_f64() < 0.03 {
                continue;
            }
            let answer = if rng.next_f64() < (chance * ability).min(0.98) {
                correct += 1;
                key[&qkey].clone()
            } else {
                json!(rng.pick(&OPTIONS))
            };
            answers.insert(qkey, answer);
        }
        let incorrect = args.questions - correct;
        let score = (correct as f64 * 20.0 / args.questions.max(1) as f64 * 100.0).round() / 100.0;

        records.push(json!({
            "codigo": format!("{cohort}{:06}", 100000 + i),
            "apellidos_nombres": format!(
                "{} {}, {}",
                rng.pick(&SURNAMES),
                rng.pick(&SURNAMES),
                rng.pick(&NAMES)
            ),
            "examen": EXAMS[exam_idx],
            "correctas": correct,
            "incorrectas": incorrect,
            "nota": score,
            "respuestas_estudiante": answers,
            "respuestas_correctas": key,
        }));
    }

    let text = serde_json::to_string_pretty(&records).context("serializing records")?;
    std::fs::write(&args.output, text)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "Wrote {} records ({} questions each) to {}",
        records.len(),
        args.questions,
        args.output.display()
    );
    Ok(())
}
