use truss1d::{BoundaryCondition, Material, Mesh, Section, Truss};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A bar of four elements between x = 0 and x = 4
    let mut truss = Truss::new(Mesh::grid(0.0, 4.0, 4)?);
    let material = truss.add_material(Material::linear_elastic(1_000.0)?);
    let section = truss.add_section(Section::rectangular(0.5, 0.2)?);
    truss.set_material_for_all(material)?;
    truss.set_section_for_all(section)?;

    // Clamp the left end, pull the right end by a fixed amount and push the middle
    let left = truss.node_at_coordinate(0.0)?;
    let middle = truss.node_at_coordinate(2.0)?;
    let right = truss.node_at_coordinate(4.0)?;
    truss.fix(left)?;
    truss.apply(right, BoundaryCondition::Displacement(0.01))?;
    truss.add_node_force(middle, -1.0, 5.0)?;

    let solution = truss.evaluate()?;
    println!("residual = {:e}", solution.residual_norm());
    for node in solution.nodes() {
        match node.reaction {
            Some(reaction) => println!(
                "x = {:.2}: u = {:+.4e}, reaction = {:+.4e}",
                node.position, node.displacement, reaction
            ),
            None => println!("x = {:.2}: u = {:+.4e}", node.position, node.displacement),
        }
    }
    for element in solution.elements() {
        println!(
            "element {}: strain = {:+.4e}, stress = {:+.4e}",
            element.element, element.strain, element.stress
        );
    }

    Ok(())
}
