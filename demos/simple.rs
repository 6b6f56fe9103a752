use truss1d::{BoundaryCondition, Material, Mesh, Section, Truss};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut truss = Truss::new(Mesh::line(1.0, 1)?);
    let a = truss.node_at_coordinate(0.0)?;
    let b = truss.node_at_coordinate(1.0)?;
    truss.fix(a)?;
    truss.apply(b, BoundaryCondition::Force(-1000.0))?;
    let steel = truss.add_material(Material::linear_elastic(200.0e9)?);
    let bar = truss.add_section(Section::truss(0.01)?);
    truss.set_material_for_all(steel)?;
    truss.set_section_for_all(bar)?;

    truss.evaluate()?;

    if let Some(displacement) = truss.node_displacement(b) {
        println!("u = {displacement:.3e} m");
    }

    Ok(())
}
