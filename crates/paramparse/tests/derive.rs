use glob::glob;
use trybuild::TestCases;

/// Each file derives records and checks them from its `main`
#[test]
fn should_pass() {
    let t = TestCases::new();
    for entry in glob("tests/valid/*.rs").expect("valid glob pattern") {
        t.pass(entry.expect("readable test path"));
    }
}
