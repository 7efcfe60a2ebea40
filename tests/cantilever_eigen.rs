use approx::assert_relative_eq;
use profile_fea::prelude::*;

fn env_usize(name: &str, default_val: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(default_val)
}

/// 60 x 30 x 3 mm 6061-T6 profile
fn profile() -> (Material, Section) {
    let section = Section::new(SectionParams::hollow_rect(0.06, 0.03, 0.003, 0.003)).unwrap();
    (Material::aluminum(), section)
}

fn build_cantilever(length: f64, n: usize) -> (Vec<Node>, Vec<BeamElement>, Vec<Support>) {
    let (material, section) = profile();
    let nodes = (0..=n)
        .map(|k| Node::new(length * k as f64 / n as f64, 0.0))
        .collect();
    let elements = (0..n)
        .map(|k| BeamElement::new(k, k + 1, material.clone(), section.clone()))
        .collect();
    (nodes, elements, Support::fixed(0))
}

#[test]
fn slender_cantilever_buckles_at_euler_load() {
    let length = 2.0;
    let n = env_usize("CANTILEVER_ELEMENTS", 1);
    let (material, section) = profile();
    let (nodes, elements, supports) = build_cantilever(length, n);

    // Slenderness L / r well above 50
    assert!(length / section.radius_of_gyration() > 50.0);

    let result = StabilityAnalysis::new(&elements, &nodes, &supports)
        .linear_buckling(&BucklingOptions::default().with_seed(17))
        .unwrap();

    let euler = std::f64::consts::PI.powi(2) * material.e * section.inertia()
        / (4.0 * length * length);
    assert!(result.converged, "buckling did not converge: {:?}", result);
    assert_relative_eq!(result.critical_load_factor, euler, max_relative = 0.10);
}

#[test]
fn cantilever_first_frequency() {
    let length = 1.0;
    let n = env_usize("CANTILEVER_ELEMENTS", 1);
    let (material, section) = profile();
    let (nodes, elements, supports) = build_cantilever(length, n);

    let result = DynamicAnalysis::new(&elements, &nodes, &supports)
        .modal_analysis(&ModalOptions::modes(1).with_seed(23))
        .unwrap();

    let f1 = 1.875_f64.powi(2) / (2.0 * std::f64::consts::PI)
        * (material.e * section.inertia() / (material.rho * section.area() * length.powi(4)))
            .sqrt();
    let mode = &result.modes[0];
    assert!(mode.converged);
    assert_relative_eq!(mode.frequency, f1, max_relative = 0.15);
    assert_relative_eq!(result.fundamental_frequency().unwrap(), mode.frequency);
}

#[test]
fn unseeded_runs_agree_within_tolerance() {
    let (nodes, elements, supports) = build_cantilever(2.0, 4);
    let analysis = StabilityAnalysis::new(&elements, &nodes, &supports);
    let a = analysis.linear_buckling(&BucklingOptions::default()).unwrap();
    let b = analysis.linear_buckling(&BucklingOptions::default()).unwrap();
    assert!(a.converged && b.converged);
    assert_relative_eq!(a.critical_load_factor, b.critical_load_factor, max_relative = 1e-6);
}

#[test]
fn catalog_material_drives_element() {
    let json = r#"{
        "7075-T6": {"e": 71.7e9, "g": 26.9e9, "nu": 0.33, "rho": 2810.0, "fy": 460e6}
    }"#;
    let catalog = MaterialCatalog::from_json(json).unwrap();
    assert!(matches!(
        catalog.get("6005A-T6"),
        Err(FEAError::MaterialNotFound(_))
    ));

    let material = catalog.get("7075-T6").unwrap().clone();
    assert_eq!(material.alloy, AlloyFamily::Wrought7xxx);

    let (_, section) = profile();
    let mut beam = BeamElement::new(0, 1, material.clone(), section);
    let mut nodes = vec![Node::new(0.0, 0.0), Node::new(1.0, 0.0)];
    nodes[1].set_displacement(5e-4, 0.0, 0.0);

    // 7xxx yield curve at 300 °C: fy,T = 0.35 * 460 MPa, elastic at this strain
    let forces = beam.update_internal_forces(&nodes, 300.0).unwrap();
    let expected = 0.85 * material.e * beam.section().area() * 5e-4;
    assert_relative_eq!(forces.n, expected, max_relative = 1e-6);
}

#[test]
fn cyclic_bending_accumulates_history() {
    let (nodes_ref, mut elements, _) = build_cantilever(1.0, 1);
    let beam = &mut elements[0];
    let mut nodes = nodes_ref.clone();

    let mut last_r = 0.0;
    for &theta in &[0.3, -0.3, 0.45, -0.45] {
        nodes[1].set_displacement(0.0, 0.5 * theta, theta);
        beam.update_internal_forces(&nodes, 20.0).unwrap();
        let r: f64 = beam.plasticity().iter().map(|p| p.state().r).sum();
        assert!(r >= last_r);
        last_r = r;
    }
    assert!(last_r > 0.0);

    beam.reset();
    assert!(beam.plasticity().iter().all(|p| *p.state() == PlasticityState::default()));
}
