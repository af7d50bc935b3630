const UNITS: [char; 4] = ['k', 'm', 'b', 't'];

/// Renders a counter with one decimal and a magnitude suffix, e.g. `1.2k` or `3m`.
pub fn abbreviate(value: i64) -> String {
	if value < 0 {
		return format!("-{}", abbreviate(value.saturating_neg()));
	}

	let mut idx = UNITS.len();

	while idx > 0 {
		let unit = idx - 1;
		let size = 1_000_f64.powi(unit as i32 + 1);

		if size <= value as f64 {
			let mut scaled = (value as f64 * 10.0 / size).round() / 10.0;
			let mut unit = unit;

			if scaled == 1_000.0 && unit < UNITS.len() - 1 {
				scaled = 1.0;
				unit += 1;
			}

			return format!("{}{}", render(scaled), UNITS[unit]);
		}

		idx -= 1;
	}

	value.to_string()
}

fn render(value: f64) -> String {
	if value.fract() == 0.0 { format!("{}", value as i64) } else { format!("{value:.1}") }
}
