//! Writes `combined_wagebill.csv`: a deterministic payroll export with the
//! quirks real exports have (padded headers, a few unparseable wages).

use std::path::PathBuf;

const COMPANIES: [&str; 4] = ["Acme Ltd", "Globex", "Initech", "Umbrella"];
const DEPARTMENTS: [(&str, f64); 5] = [
    ("Finance", 5200.0),
    ("HR", 4100.0),
    ("IT", 6100.0),
    ("Operations", 3800.0),
    ("Sales", 4600.0),
];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

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

    fn range(&mut self, lo: usize, hi: usize) -> usize {
        lo + (self.next_u64() % (hi - lo) as u64) as usize
    }
}

fn main() -> anyhow::Result<()> {
    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("combined_wagebill.csv"));

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&out)?;
    writer.write_record([" Company", "department ", " DATE ", "Wage", "Employees"])?;

    let mut rows = 0usize;
    for year in [2023, 2024] {
        for month in MONTHS {
            let date = format!("{month}-{year}");
            for company in COMPANIES {
                for (department, base) in DEPARTMENTS {
                    let employees = rng.range(3, 25);
                    let wage = base * employees as f64 * (0.9 + 0.2 * rng.next_f64());
                    // Roughly one cell in fifty is junk, like hand-edited exports.
                    let wage_cell = if rng.range(0, 50) == 0 {
                        "n/a".to_string()
                    } else {
                        format!("{wage:.2}")
                    };
                    let employees = employees.to_string();
                    writer.write_record([
                        company,
                        department,
                        date.as_str(),
                        wage_cell.as_str(),
                        employees.as_str(),
                    ])?;
                    rows += 1;
                }
            }
        }
    }
    writer.flush()?;

    println!("Wrote {rows} rows to {}", out.display());
    Ok(())
}
