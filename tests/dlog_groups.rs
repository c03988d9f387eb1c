use num_bigint::BigUint;
use rand_core::OsRng;
use sigma_dlog::{
    dlog::{
        ConfigError, DlogEllipticCurve, DlogGroup, EcF2mGroup, F2mGroupOptions, GroupError, JsonCurveParams,
        NativeF2m, Secp256k1Group,
    },
    sigma::{
        dlog::{DlogCommonInput, DlogProver, DlogProverInput, DlogVerifier},
        execute, Challenge, SigmaParams, SigmaProverComputation, SigmaVerifierComputation,
    },
};

fn check_group_laws<G: DlogGroup>(group: &G) {
    assert!(group.is_member(group.generator()));
    assert!(group.is_member(&group.identity()));

    let x = group.random_exponent(&mut OsRng);
    let y = group.random_exponent(&mut OsRng);
    let gx = group.exponentiate_generator(&x);
    let gy = group.exponentiate_generator(&y);
    assert_eq!(group.multiply(&gx, &gy), group.exponentiate_generator(&((&x + &y) % group.order())));
    assert!(group.is_identity(&group.multiply(&gx, &group.inverse(&gx))));

    for element in [gx, group.identity(), group.generator().clone()] {
        let bytes = group.element_to_bytes(&element);
        assert_eq!(bytes.len(), group.element_byte_len());
        assert_eq!(group.element_from_bytes(&bytes).unwrap(), element);
    }
}

fn prove<G: DlogGroup>(group: &G, correct_witness: bool) -> bool {
    let params = SigmaParams::default();
    let w = group.random_exponent(&mut OsRng);
    let common = DlogCommonInput::new(group.exponentiate_generator(&w));
    let witness = if correct_witness {
        w
    } else {
        (w + BigUint::from(1u32)) % group.order()
    };
    let input = DlogProverInput::new(common.clone(), witness);

    let mut prover = DlogProver::new(group, params).unwrap();
    let mut verifier = DlogVerifier::new(group, params).unwrap();
    execute(&mut OsRng, &mut prover, &mut verifier, &input, common).unwrap()
}

#[test]
fn binary_curves() {
    for name in ["B-163", "K-163", "B-233", "K-233"] {
        let group = EcF2mGroup::nist(name).unwrap();
        check_group_laws(&group);
        assert!(prove(&group, true), "{name}");
        assert!(!prove(&group, false), "{name}");
    }
}

#[test]
fn secp256k1() {
    let group = Secp256k1Group::new();
    check_group_laws(&group);
    assert!(prove(&group, true));
    assert!(!prove(&group, false));

    let message = b"a message of thirty bytes!!!!!";
    let element = group.encode_bytes_to_element(message).unwrap();
    assert_eq!(group.decode_element_to_bytes(&element).unwrap(), message);
}

#[test]
fn byte_string_mapping_is_a_capability() {
    let binary = EcF2mGroup::nist("B-163").unwrap();
    assert_eq!(binary.max_encodable_len(), 0);
    assert!(matches!(
        binary.encode_bytes_to_element(b""),
        Err(GroupError::Unsupported(_))
    ));

    let prime = Secp256k1Group::new();
    assert_eq!(prime.max_encodable_len(), 30);
    // An empty byte string is a valid input, distinct from an unsupported mapping
    let empty = prime.encode_bytes_to_element(b"").unwrap();
    assert_eq!(prime.decode_element_to_bytes(&empty).unwrap(), b"");
}

#[test]
fn fiat_shamir_dlog_proof() {
    let group = Secp256k1Group::new();
    let params = SigmaParams::default();
    let w = group.random_exponent(&mut OsRng);
    let common = DlogCommonInput::new(group.exponentiate_generator(&w));
    let input = DlogProverInput::new(common.clone(), w);
    let statement = group.element_to_bytes(common.h());

    let mut prover = DlogProver::new(&group, params).unwrap();
    let a = prover.compute_first_message(&mut OsRng, &input).unwrap();
    let challenge = Challenge::from_transcript(b"dlog", &statement, &a, params.soundness_bits);
    let z = prover.compute_second_message(&challenge).unwrap();

    let mut verifier = DlogVerifier::new(&group, params).unwrap();
    verifier.set_input(common).unwrap();
    verifier
        .set_challenge(Challenge::from_transcript(b"dlog", &statement, &a, params.soundness_bits))
        .unwrap();
    assert!(verifier.verify(&a, &z).unwrap());
}

const CUSTOM_CURVES: &str = r#"{
    "B-163-custom": {
        "field": "F2m",
        "m": 163,
        "k1": 3,
        "k2": 6,
        "k3": 7,
        "a": "1",
        "b": "020A601907B8C953CA1481EB10512F78744A3205FD",
        "gx": "03F0EBA16286A2D57EA0991168D4994637E8343E36",
        "gy": "00D51FBC6C71A0094FA2CDD545B11C5C0C797324F1",
        "order": "040000000000000000000292FE77E70C12A4234C33",
        "cofactor": "2"
    },
    "B-163-corrupted": {
        "field": "F2m",
        "m": 163,
        "k1": 3,
        "k2": 6,
        "k3": 7,
        "a": "1",
        "b": "020A601907B8C953CA1481EB10512F78744A3205FD",
        "gx": "03F0EBA16286A2D57EA0991168D4994637E8343E36",
        "gy": "00D51FBC6C71A0094FA2CDD545B11C5C0C797324F0",
        "order": "040000000000000000000292FE77E70C12A4234C33",
        "cofactor": "2"
    },
    "B-163-bad-basis": {
        "field": "F2m",
        "m": 163,
        "k1": 3,
        "k3": 7,
        "a": "1",
        "b": "020A601907B8C953CA1481EB10512F78744A3205FD",
        "gx": "03F0EBA16286A2D57EA0991168D4994637E8343E36",
        "gy": "00D51FBC6C71A0094FA2CDD545B11C5C0C797324F1",
        "order": "040000000000000000000292FE77E70C12A4234C33",
        "cofactor": "2"
    },
    "P-tiny": {
        "field": "Fp",
        "p": "17",
        "a": "2",
        "b": "2",
        "gx": "5",
        "gy": "1",
        "order": "13",
        "cofactor": "1"
    }
}"#;

#[test_log::test]
fn custom_parameter_source() {
    let source = JsonCurveParams::from_json(CUSTOM_CURVES).unwrap();
    let verify = F2mGroupOptions { verify_generator: true };

    let group = EcF2mGroup::<NativeF2m>::from_source(&source, "B-163-custom", verify).unwrap();
    let nist = EcF2mGroup::nist("B-163").unwrap();
    assert_eq!(group.generator(), nist.generator());
    assert_eq!(group.coordinates(group.generator()), nist.coordinates(nist.generator()));

    // Trusted by default, rejected when verification is requested
    let trusted =
        EcF2mGroup::<NativeF2m>::from_source(&source, "B-163-corrupted", F2mGroupOptions::default()).unwrap();
    assert!(!trusted.is_member(trusted.generator()));
    assert_eq!(
        EcF2mGroup::<NativeF2m>::from_source(&source, "B-163-corrupted", verify).unwrap_err(),
        ConfigError::InvalidGenerator("B-163-corrupted".into())
    );

    assert_eq!(
        EcF2mGroup::<NativeF2m>::from_source(&source, "B-163-bad-basis", verify).unwrap_err(),
        ConfigError::MalformedBasis("B-163-bad-basis".into())
    );
    assert!(matches!(
        EcF2mGroup::<NativeF2m>::from_source(&source, "P-tiny", verify).unwrap_err(),
        ConfigError::UnsupportedField { .. }
    ));
    assert_eq!(
        EcF2mGroup::<NativeF2m>::from_source(&source, "B-283", verify).unwrap_err(),
        ConfigError::MissingCurve("B-283".into())
    );
}
