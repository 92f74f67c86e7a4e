use idcheck::validation::NameMatcher;

// (OCR text, expected name)
const CASES: &[(&str, &str)] = &[
    ("王小明", "王小明"),
    ("王 小 明", "王小明"),
    ("玉小明", "王小明"),
    ("0小明", "王小明"),
    ("李小明中華民國", "李小明"),
    ("姓名李小明出生", "李小明"),
    ("季小明", "李小明"),
    ("木小明", "李小明"),
    ("陳大華", "陳大華"),
    ("陸大華", "陳大華"),
    ("呂小美", "吳小美"),
    ("朱 建 國", "朱建國"),
    ("未建國", "朱建國"),
    ("崔偉明", "崔偉明"),
    ("催偉明", "崔偉明"),
];

fn main() {
    println!("Name Matching Demo");
    println!("------------------");

    let matcher = NameMatcher::default();
    let mut passed = 0;

    for (i, (text, name)) in CASES.iter().enumerate() {
        let strategy = matcher.match_strategy(text, name);
        match strategy {
            Some(s) => {
                passed += 1;
                println!("  {:2}. PASS  '{}' vs '{}' ({})", i + 1, text, name, s);
            }
            None => println!("  {:2}. FAIL  '{}' vs '{}'", i + 1, text, name),
        }
    }

    println!(
        "\nRESULT: {}/{} passed ({:.1}%)",
        passed,
        CASES.len(),
        passed as f64 / CASES.len() as f64 * 100.0
    );
    if passed != CASES.len() {
        std::process::exit(1);
    }
}
