use paramparse::prelude::*;

#[derive(Record, Default, Debug, PartialEq)]
struct Resolution {
    #[rule(int())]
    width: i32,
    #[anchor("x")]
    #[rule(int())]
    height: i32,
}

#[derive(Record, Default, Debug, PartialEq)]
struct Screen {
    #[embed]
    native: Resolution,
    #[rule(optional(array(record::<Resolution>())))]
    supported: Option<Vec<Resolution>>,
}

fn main() {
    let (screen, read) =
        Screen::parse("1920 x 1080 1280 x 720, 640 x 480").expect("display modes");
    assert_eq!(read, 33);
    assert_eq!(screen.native, Resolution { width: 1920, height: 1080 });
    assert_eq!(screen.supported.map(|modes| modes.len()), Some(2));

    let mut partial = Screen::default();
    assert_eq!(partial.parse_into("800 y 600"), Err(NoMatch::at(4)));
    assert_eq!(partial.native.width, 800);
}
