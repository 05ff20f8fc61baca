use crewgraph::{Compiler, Config, Connection, Editor, Graph, GraphModel, Handle, NodeKind, Position, store::Store};

fn main() {
    let text = include_str!("./graph.json");

    let model = GraphModel::from_json(text).unwrap();
    let graph = Graph::try_from(&model).unwrap();

    println!("{}", graph.summary());
    println!();

    let compiler = Compiler::new(Config::default().compile);
    println!("{}", compiler.declarative(&graph).unwrap());
    println!("{}", compiler.scaffold(&graph));

    // extend the saved crew with a review step and save it under a new name
    let store = Store::default();
    store.save("blog", "Blog crew", &graph).unwrap();

    let mut editor = Editor::with_config(&Config::default());
    let title = editor.load(&store, "blog").unwrap();

    let review = editor.drop_node(NodeKind::Task, Position::new(1220.0, 160.0), None).unwrap();
    editor.change(&review, "name", "Review").unwrap();
    editor.change(&review, "description", "Proofread the post.").unwrap();
    let verdict = editor.connect(Connection::new("node_4", Some(Handle::ExecOut), review, Some(Handle::ExecIn))).unwrap();
    println!("review connected: {:?}", verdict);

    editor.save(&store, "blog-reviewed", &format!("{} (reviewed)", title)).unwrap();
    println!("saved graphs: {:?}", store.list().unwrap());
    println!("{}", editor.render_scaffold());
}
