use anyhow::Result;
use course_material_eval::utils::logging;
use course_material_eval::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 三个文件路径按位置传入：rubric lesson overview
    let args: Vec<String> = std::env::args().skip(1).collect();
    let paths: [String; 3] = match args.try_into() {
        Ok(paths) => paths,
        Err(_) => {
            eprintln!("Usage: course_material_eval <rubric.docx> <lesson.pptx> <overview.pdf>");
            std::process::exit(2);
        }
    };

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用
    let app = App::initialize(config).await?;
    app.run(paths).await?;

    Ok(())
}
