use paramparse::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Profile {
    #[default]
    Avp,
    Savp,
}

#[derive(Record, Default, Debug, PartialEq)]
struct Transport {
    #[anchor("RTP")]
    #[rule(variants(&[("SAVP", Profile::Savp), ("AVP", Profile::Avp)]))]
    profile: Profile,
    #[anchor("ports")]
    #[rule(array(int()))]
    ports: Vec<i32>,
    #[skip]
    negotiated: bool,
}

fn main() {
    assert_eq!(
        Transport::parse("RTP SAVP ports 5000, 5001"),
        Ok((
            Transport {
                profile: Profile::Savp,
                ports: vec![5000, 5001],
                negotiated: false,
            },
            25
        ))
    );
    assert_eq!(Transport::parse("RTP AVP port 1"), Err(NoMatch::at(8)));
}
